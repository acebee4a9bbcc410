mod builder;
pub mod views;

pub use builder::{CategoryBlock, LayoutError, ReportLabels, ReportLayoutBuilder};
pub use views::{CellValue, ReportPayload, Rgb, StyleDescriptor, StyleRegion, StyleTag};
