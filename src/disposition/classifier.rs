//! Post-routing order classification.

use tracing::debug;

use super::ScoringModel;
use crate::config::DispositionSettings;
use crate::distance::TimeMatrix;
use crate::models::{Category, DispositionRecord, Order, TripPlan};

/// Buckets every order of a solved trip and scores the fit.
///
/// Served orders are KEEP. An order the plan dropped is measured by its mean
/// travel time to the served stops (the cluster) and becomes
/// EARLY_DELIVERY when close and early-eligible, RESCHEDULE when within
/// the reschedule threshold, CANCEL otherwise. When nothing was served the
/// cluster is unreachable and every dropped order is CANCEL.
///
/// # Examples
///
/// ```
/// use u_dispatch::disposition::DispositionClassifier;
/// use u_dispatch::distance::TimeMatrix;
/// use u_dispatch::models::{Category, DeliveryWindow, Order, Route, TripPlan, Visit};
///
/// let w = DeliveryWindow::from_hm(9, 0, 11, 0).unwrap();
/// let orders = vec![Order::new("a", 10, w), Order::new("b", 10, w).with_early_delivery(true)];
/// let tm = TimeMatrix::from_rows(&[vec![0, 5, 9], vec![5, 0, 8], vec![9, 8, 0]]).unwrap();
///
/// let mut route = Route::new(0);
/// route.push_visit(Visit { node: 1, sequence_index: 0, arrival_minute: 5, departure_minute: 7, load_after: 10 });
/// let plan = TripPlan::new(vec![route], vec![2], 100_012);
///
/// let records = DispositionClassifier::default().classify(&orders, &plan, &tm);
/// assert_eq!(records[0].category, Category::Keep);
/// assert_eq!(records[1].category, Category::EarlyDelivery);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DispositionClassifier {
    settings: DispositionSettings,
}

impl DispositionClassifier {
    /// Creates a classifier with the given thresholds and bands.
    pub fn new(settings: DispositionSettings) -> Self {
        Self { settings }
    }

    /// Returns the classifier settings.
    pub fn settings(&self) -> &DispositionSettings {
        &self.settings
    }

    /// Score bands in use.
    pub fn scoring(&self) -> &ScoringModel {
        &self.settings.scoring
    }

    /// Category for a dropped order at `avg_minutes` from the cluster.
    ///
    /// `None` means nothing was served.
    pub fn category_for(&self, early_delivery_ok: bool, avg_minutes: Option<f64>) -> Category {
        let d = avg_minutes.unwrap_or(TimeMatrix::UNREACHABLE as f64);
        if early_delivery_ok && d < self.settings.early_threshold_minutes {
            Category::EarlyDelivery
        } else if d < self.settings.reschedule_threshold_minutes {
            Category::Reschedule
        } else {
            Category::Cancel
        }
    }

    /// Classifies one window's orders against its plan.
    ///
    /// `orders[i]` is matrix node `i + 1`, and `matrix` must be the matrix
    /// the plan was solved on. Records come back in node order, one per
    /// order.
    pub fn classify(
        &self,
        orders: &[Order],
        plan: &TripPlan,
        matrix: &TimeMatrix,
    ) -> Vec<DispositionRecord> {
        let kept = plan.kept_nodes();
        let records: Vec<DispositionRecord> = orders
            .iter()
            .enumerate()
            .map(|(i, order)| {
                let node = i + 1;
                match plan.position_of(node) {
                    Some((vehicle, seq)) => self.keep_record(order, node, vehicle, seq, &kept, matrix),
                    None => self.dropped_record(order, node, &kept, matrix),
                }
            })
            .collect();
        debug!(
            orders = orders.len(),
            kept = kept.len(),
            early = count(&records, Category::EarlyDelivery),
            reschedule = count(&records, Category::Reschedule),
            cancel = count(&records, Category::Cancel),
            "classified window"
        );
        records
    }

    fn keep_record(
        &self,
        order: &Order,
        node: usize,
        vehicle: usize,
        seq: usize,
        kept: &[usize],
        matrix: &TimeMatrix,
    ) -> DispositionRecord {
        let others: Vec<usize> = kept.iter().copied().filter(|&k| k != node).collect();
        let avg = matrix.mean_from(node, &others).unwrap_or(0.0);
        DispositionRecord {
            order_id: order.id().to_string(),
            node,
            category: Category::Keep,
            reason: format!("served by vehicle {} as stop {}", vehicle + 1, seq + 1),
            score: self.scoring().score(Category::Keep, avg, order.units()),
            avg_minutes_to_cluster: Some(avg),
        }
    }

    fn dropped_record(
        &self,
        order: &Order,
        node: usize,
        kept: &[usize],
        matrix: &TimeMatrix,
    ) -> DispositionRecord {
        let avg = matrix.mean_from(node, kept);
        let category = self.category_for(order.early_delivery_ok(), avg);
        let distance = avg.unwrap_or(TimeMatrix::UNREACHABLE as f64);
        let reason = match (category, avg) {
            (_, None) => "no orders kept in this window, nothing nearby to join".to_string(),
            (Category::EarlyDelivery, Some(d)) => {
                format!("{d:.1} min from the route and customer accepts early delivery")
            }
            (Category::Reschedule, Some(d)) => {
                format!("{d:.1} min from the route, better served in another window")
            }
            (_, Some(d)) => format!("{d:.1} min from the route, too far to serve"),
        };
        DispositionRecord {
            order_id: order.id().to_string(),
            node,
            category,
            reason,
            score: self.scoring().score(category, distance, order.units()),
            avg_minutes_to_cluster: avg,
        }
    }
}

fn count(records: &[DispositionRecord], category: Category) -> usize {
    records.iter().filter(|r| r.category == category).count()
}
