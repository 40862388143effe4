mod geometry;
mod walker;
