pub mod clock;
pub mod surface_presenter;
