mod boundary_splitter;

pub use boundary_splitter::RecursiveBoundarySplitter;
