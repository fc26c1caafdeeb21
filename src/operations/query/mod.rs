mod connected;
mod intersect;

pub use connected::{components, Component, ConnectedComponent, ConnectedWalls};
pub use intersect::{
    extended_centerline_intersection, EndpointHit, FindIntersectingWalls, IntersectionHits,
    WallHit, DEFAULT_INTERSECTION_TOLERANCE, SEGMENT_BOUNDS_SLACK,
};
