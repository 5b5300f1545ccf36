pub mod dynamics;
pub mod params;
pub mod regime;
pub mod state;
