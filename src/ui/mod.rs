pub mod panels;
pub mod plot;
pub mod table;
pub mod value_boxes;
