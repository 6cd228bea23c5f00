//! Delivery order and priority tag types.

use serde::{Deserialize, Serialize};

use super::DeliveryWindow;

/// Customer classifications that lock an order to its requested window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityTag {
    /// Power customer.
    Power,
    /// VIP customer.
    Vip,
}

impl PriorityTag {
    /// Parses a raw customer tag, ignoring case and surrounding whitespace.
    ///
    /// Returns `None` for tags that carry no priority.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_dispatch::models::PriorityTag;
    ///
    /// assert_eq!(PriorityTag::parse(" VIP "), Some(PriorityTag::Vip));
    /// assert_eq!(PriorityTag::parse("regular"), None);
    /// ```
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "power" => Some(Self::Power),
            "vip" => Some(Self::Vip),
            _ => None,
        }
    }
}

/// A delivery request.
///
/// Orders are read-only for the whole pipeline: every stage attaches new
/// decision records instead of editing the order.
///
/// # Examples
///
/// ```
/// use u_dispatch::models::{DeliveryWindow, Order, PriorityTag};
///
/// let window = DeliveryWindow::from_hm(11, 0, 13, 0).unwrap();
/// let order = Order::new("70592", 26, window)
///     .with_early_delivery(true)
///     .with_priority(PriorityTag::Vip)
///     .with_address("3522 Linden Street Dearborn 48124");
/// assert_eq!(order.units(), 26);
/// assert!(order.is_priority());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    id: String,
    units: i32,
    #[serde(default)]
    early_delivery_ok: bool,
    original_window: DeliveryWindow,
    #[serde(default)]
    priority_tag: Option<PriorityTag>,
    #[serde(default)]
    prior_reschedule_count: u32,
    #[serde(default)]
    address: String,
}

impl Order {
    /// Creates an order with no early-delivery consent, no priority tag and
    /// no prior reschedules.
    pub fn new(id: impl Into<String>, units: i32, original_window: DeliveryWindow) -> Self {
        Self {
            id: id.into(),
            units,
            early_delivery_ok: false,
            original_window,
            priority_tag: None,
            prior_reschedule_count: 0,
            address: String::new(),
        }
    }

    /// Sets whether the customer accepts delivery in an earlier window.
    pub fn with_early_delivery(mut self, ok: bool) -> Self {
        self.early_delivery_ok = ok;
        self
    }

    /// Sets the priority tag.
    pub fn with_priority(mut self, tag: PriorityTag) -> Self {
        self.priority_tag = Some(tag);
        self
    }

    /// Sets the number of times the order was already rescheduled.
    pub fn with_prior_reschedules(mut self, count: u32) -> Self {
        self.prior_reschedule_count = count;
        self
    }

    /// Sets the delivery address handed to the travel-time provider.
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    /// Stable order identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Order size (demand).
    pub fn units(&self) -> i32 {
        self.units
    }

    /// Whether the customer consented to an earlier window.
    pub fn early_delivery_ok(&self) -> bool {
        self.early_delivery_ok
    }

    /// The window the customer asked for.
    pub fn original_window(&self) -> &DeliveryWindow {
        &self.original_window
    }

    /// Priority classification, if any.
    pub fn priority_tag(&self) -> Option<PriorityTag> {
        self.priority_tag
    }

    /// Returns `true` if the order carries a recognized priority tag.
    pub fn is_priority(&self) -> bool {
        self.priority_tag.is_some()
    }

    /// Number of earlier reschedules.
    pub fn prior_reschedule_count(&self) -> u32 {
        self.prior_reschedule_count
    }

    /// Delivery address.
    pub fn address(&self) -> &str {
        &self.address
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> DeliveryWindow {
        DeliveryWindow::from_hm(9, 0, 11, 0).expect("valid")
    }

    #[test]
    fn test_order_defaults() {
        let o = Order::new("A", 10, window());
        assert_eq!(o.id(), "A");
        assert!(!o.early_delivery_ok());
        assert!(!o.is_priority());
        assert_eq!(o.prior_reschedule_count(), 0);
        assert_eq!(o.address(), "");
    }

    #[test]
    fn test_order_builder() {
        let o = Order::new("B", 4, window())
            .with_early_delivery(true)
            .with_priority(PriorityTag::Power)
            .with_prior_reschedules(2)
            .with_address("6178 Gulley St");
        assert!(o.early_delivery_ok());
        assert_eq!(o.priority_tag(), Some(PriorityTag::Power));
        assert_eq!(o.prior_reschedule_count(), 2);
        assert_eq!(o.address(), "6178 Gulley St");
    }

    #[test]
    fn test_priority_parse() {
        assert_eq!(PriorityTag::parse("power"), Some(PriorityTag::Power));
        assert_eq!(PriorityTag::parse("Power"), Some(PriorityTag::Power));
        assert_eq!(PriorityTag::parse("vip\n"), Some(PriorityTag::Vip));
        assert_eq!(PriorityTag::parse(""), None);
        assert_eq!(PriorityTag::parse("gold"), None);
    }

    #[test]
    fn test_order_deserialize_defaults() {
        let json = r#"{
            "id": "70509",
            "units": 2,
            "original_window": {"start": "09:00:00", "end": "11:00:00"}
        }"#;
        let o: Order = serde_json::from_str(json).expect("parse");
        assert_eq!(o.units(), 2);
        assert!(!o.early_delivery_ok());
        assert_eq!(o.priority_tag(), None);
        assert_eq!(o.original_window(), &window());
    }

    #[test]
    fn test_order_deserialize_priority() {
        let json = r#"{
            "id": "1",
            "units": 2,
            "original_window": {"start": "09:00:00", "end": "11:00:00"},
            "priority_tag": "vip"
        }"#;
        let o: Order = serde_json::from_str(json).expect("parse");
        assert_eq!(o.priority_tag(), Some(PriorityTag::Vip));
    }
}
