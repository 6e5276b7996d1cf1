use serde::{Deserialize, Serialize};

use crate::calculations::money::dollars_to_cents;
use crate::models::{BasisPoints, Cents};

/// Where an invoice line came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InvoiceLineSource {
    ChangeOrder { cor_number: String },
    Ticket { ticket_number: String },
    Manual,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceLineItem {
    pub source: InvoiceLineSource,
    pub description: String,
    pub amount: Cents,
}

impl InvoiceLineItem {
    /// A line billing a change order at its computed total.
    pub fn change_order(
        cor_number: impl Into<String>,
        description: impl Into<String>,
        amount: Cents,
    ) -> Self {
        Self {
            source: InvoiceLineSource::ChangeOrder {
                cor_number: cor_number.into(),
            },
            description: description.into(),
            amount,
        }
    }

    /// A line billing a signed time-and-materials ticket.
    pub fn ticket(
        ticket_number: impl Into<String>,
        description: impl Into<String>,
        amount: Cents,
    ) -> Self {
        Self {
            source: InvoiceLineSource::Ticket {
                ticket_number: ticket_number.into(),
            },
            description: description.into(),
            amount,
        }
    }

    /// A manual line whose amount was typed in dollars (`"1,250.00"`).
    /// Unparseable amounts become zero.
    pub fn manual(
        description: impl Into<String>,
        dollars: &str,
    ) -> Self {
        Self {
            source: InvoiceLineSource::Manual,
            description: description.into(),
            amount: dollars_to_cents(dollars),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Invoice {
    pub id: i64,
    pub project_id: i64,
    pub invoice_number: String,
    pub retention_percent: BasisPoints,
    pub line_items: Vec<InvoiceLineItem>,
}
