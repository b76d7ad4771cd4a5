pub mod box_painter;
