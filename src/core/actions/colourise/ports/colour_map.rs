use crate::core::data::colour::Colour;

pub trait ColourMap: Sync {
    type T;

    fn map(&self, value: Self::T) -> Colour;
}
