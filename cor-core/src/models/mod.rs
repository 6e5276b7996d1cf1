mod change_order;
mod draw_request;
mod invoice;
mod line_item;
pub(crate) mod units;

pub use change_order::{ChangeOrderRequest, CorStatus};
pub use draw_request::{DrawRequest, DrawStatus, ScheduleOfValuesLine, SovItem};
pub use invoice::{Invoice, InvoiceLineItem, InvoiceLineSource};
pub use line_item::{
    CostCategory, EquipmentItem, LaborItem, LineItem, MaterialItem, SourceType, SubcontractorItem,
};
pub use units::{BASIS_POINTS_PER_WHOLE, BasisPoints, Cents};
