mod nearest_walk_point;

pub use nearest_walk_point::NearestWalkPoint;
