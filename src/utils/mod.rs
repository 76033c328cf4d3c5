pub mod constants;
pub mod distance;
pub mod keyboard;
pub mod map_link;
