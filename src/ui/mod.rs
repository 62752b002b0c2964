pub mod pages;
pub mod panels;
pub mod plot;
