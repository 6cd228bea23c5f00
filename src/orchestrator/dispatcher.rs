//! The dispatch pipeline.

use std::collections::HashMap;

use rayon::prelude::*;
use tracing::{info, warn};

use super::report::{DispatchReport, OrderOutcome, WindowReport, WindowStatus};
use crate::allocation::{WindowAllocator, WindowOrders};
use crate::config::PlannerConfig;
use crate::disposition::DispositionClassifier;
use crate::distance::TravelTimeProvider;
use crate::error::{DispatchError, Result};
use crate::evaluation::RouteMetrics;
use crate::models::{
    AllocationDecision, Category, Decision, DeliveryWindow, DispositionRecord, Order, RouteStop,
    TripProblem,
};
use crate::solver::RouteSolver;
use crate::strategy;

/// Runs allocation, per-window routing and classification.
///
/// Windows are planned in parallel. A window whose travel times cannot be
/// obtained is reported as failed while the others complete; only invalid
/// configuration or input aborts the run.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
///
/// use u_dispatch::config::PlannerConfig;
/// use u_dispatch::distance::{ProviderError, TimeMatrix};
/// use u_dispatch::models::{Category, DeliveryWindow, Order};
/// use u_dispatch::orchestrator::Dispatcher;
///
/// let provider = |locations: &[&str]| -> Result<TimeMatrix, ProviderError> {
///     let n = locations.len();
///     let mut tm = TimeMatrix::new(n);
///     for i in 0..n {
///         for j in 0..n {
///             if i != j {
///                 tm.set(i, j, if i == 0 || j == 0 { 10 } else { 3 });
///             }
///         }
///     }
///     Ok(tm)
/// };
///
/// let morning = DeliveryWindow::from_hm(9, 0, 11, 0).unwrap();
/// let orders = vec![
///     Order::new("A", 20, morning).with_address("1 Elm St"),
///     Order::new("B", 25, morning).with_address("9 Oak Ave"),
/// ];
/// let capacities = HashMap::from([(morning.label(), 80)]);
///
/// let mut config = PlannerConfig::default();
/// config.solver.max_iterations = Some(100);
/// let dispatcher = Dispatcher::new(config, provider, "Depot");
/// let report = dispatcher.plan(&orders, &[morning], &capacities).unwrap();
/// assert_eq!(report.count(Category::Keep), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Dispatcher<P> {
    config: PlannerConfig,
    provider: P,
    depot: String,
}

/// A window's routing and classification result.
struct WindowPlan {
    records: Vec<DispositionRecord>,
    stops: Vec<RouteStop>,
    metrics: Vec<RouteMetrics>,
    objective: i64,
}

impl<P: TravelTimeProvider> Dispatcher<P> {
    /// Creates a dispatcher routing from the `depot` address.
    pub fn new(config: PlannerConfig, provider: P, depot: impl Into<String>) -> Self {
        Self {
            config,
            provider,
            depot: depot.into(),
        }
    }

    /// The configuration in use.
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Depot address.
    pub fn depot(&self) -> &str {
        &self.depot
    }

    /// Plans every order.
    ///
    /// `capacities` is keyed by [`DeliveryWindow::label`].
    ///
    /// # Errors
    ///
    /// Configuration and input validation errors. Per-window failures are
    /// reported in the returned [`DispatchReport`] instead.
    pub fn plan(
        &self,
        orders: &[Order],
        windows: &[DeliveryWindow],
        capacities: &HashMap<String, i32>,
    ) -> Result<DispatchReport> {
        self.config.validate()?;
        let allocator = WindowAllocator::new(self.config.allocation.clone());
        let (decisions, allocated) = allocator.allocate(orders, windows, capacities)?.into_parts();

        let results: Vec<(WindowReport, Result<WindowPlan>)> = allocated
            .par_iter()
            .map(|wo| self.plan_window(wo))
            .collect();

        let mut window_reports = Vec::with_capacity(results.len());
        let mut by_order: HashMap<String, OrderSlot> = HashMap::new();
        for ((mut report, result), wo) in results.into_iter().zip(&allocated) {
            match result {
                Ok(plan) => {
                    for record in &plan.records {
                        report.tally(record.category);
                    }
                    let mut stops: HashMap<&str, &RouteStop> =
                        plan.stops.iter().map(|s| (s.order_id.as_str(), s)).collect();
                    for record in plan.records {
                        let stop = stops.remove(record.order_id.as_str()).cloned();
                        by_order.insert(record.order_id.clone(), OrderSlot::Classified(record, stop));
                    }
                    report.stops = plan.stops;
                    report.metrics = plan.metrics;
                    if report.status == WindowStatus::Planned {
                        report.objective = Some(plan.objective);
                    }
                }
                Err(e) => {
                    let reason = e.to_string();
                    warn!(window = %report.label, error = %reason, "window planning failed");
                    for order in wo.orders() {
                        by_order.insert(order.id().to_string(), OrderSlot::Failed(reason.clone()));
                    }
                    report.status = WindowStatus::Failed { reason };
                }
            }
            window_reports.push(report);
        }

        let outcomes: Vec<OrderOutcome> = decisions
            .into_iter()
            .map(|d| outcome_for(d, &mut by_order))
            .collect();

        let report = DispatchReport {
            outcomes,
            windows: window_reports,
        };
        info!(
            orders = orders.len(),
            windows = report.windows.len(),
            failed = report.failed_windows().count(),
            keep = report.count(Category::Keep),
            early = report.count(Category::EarlyDelivery),
            reschedule = report.count(Category::Reschedule),
            cancel = report.count(Category::Cancel),
            "dispatch planned"
        );
        Ok(report)
    }

    fn plan_window(&self, wo: &WindowOrders) -> (WindowReport, Result<WindowPlan>) {
        let window = *wo.window();
        if wo.is_empty() {
            let report = WindowReport::new(window, 0, 0, WindowStatus::Empty);
            return (report, Ok(WindowPlan::empty()));
        }
        let report = WindowReport::new(window, wo.orders().len(), wo.total_units(), WindowStatus::Planned);
        info!(window = %report.label, orders = report.orders, units = report.units, "planning window");
        let result = self.route_window(&window, wo.orders());
        if let Ok(plan) = &result {
            info!(
                window = %report.label,
                kept = plan.stops.len(),
                objective = plan.objective,
                "window planned"
            );
        }
        (report, result)
    }

    fn route_window(&self, window: &DeliveryWindow, orders: &[Order]) -> Result<WindowPlan> {
        let mut locations: Vec<&str> = Vec::with_capacity(orders.len() + 1);
        locations.push(self.depot.as_str());
        locations.extend(orders.iter().map(Order::address));
        let matrix = self.provider.time_matrix(&locations)?;
        if matrix.size() != locations.len() {
            return Err(DispatchError::MatrixShape {
                expected: locations.len(),
                actual: matrix.size(),
            });
        }

        let mut demands = Vec::with_capacity(locations.len());
        demands.push(0);
        demands.extend(orders.iter().map(Order::units));
        let service = self
            .config
            .service_time
            .for_nodes(orders.iter().map(Order::units));
        let max_minutes = self
            .config
            .max_route_minutes
            .unwrap_or_else(|| window.duration_minutes());
        let problem = TripProblem::new(
            matrix,
            demands,
            service,
            self.config.vehicle.capacity,
            max_minutes,
            self.config.vehicle.count,
        )?;

        let solver = RouteSolver::new(self.config.solver.clone());
        let plan = strategy::plan_trip(self.config.strategy, &problem, &solver)?;
        let classifier = DispositionClassifier::new(self.config.disposition.clone());
        let records = classifier.classify(orders, &plan, problem.matrix());

        let stops = plan
            .routes()
            .iter()
            .flat_map(|route| {
                route.visits().iter().map(move |v| RouteStop {
                    order_id: orders[v.node - 1].id().to_string(),
                    vehicle: route.vehicle_id(),
                    sequence_index: v.sequence_index,
                    arrival_minute: v.arrival_minute,
                })
            })
            .collect();
        let metrics = plan
            .routes()
            .iter()
            .filter(|r| !r.is_empty())
            .map(|r| RouteMetrics::from_route(r, &problem))
            .collect();

        Ok(WindowPlan {
            records,
            stops,
            metrics,
            objective: plan.objective(),
        })
    }
}

impl WindowPlan {
    fn empty() -> Self {
        Self {
            records: Vec::new(),
            stops: Vec::new(),
            metrics: Vec::new(),
            objective: 0,
        }
    }
}

enum OrderSlot {
    Classified(DispositionRecord, Option<RouteStop>),
    Failed(String),
}

fn outcome_for(decision: AllocationDecision, by_order: &mut HashMap<String, OrderSlot>) -> OrderOutcome {
    let mut outcome = OrderOutcome {
        order_id: decision.order_id().to_string(),
        original_window: *decision.original_window(),
        assigned_window: decision.assigned_window().copied(),
        allocation: decision.decision(),
        category: None,
        reason: decision.reason().to_string(),
        score: None,
        vehicle: None,
        sequence_index: None,
        arrival_minute: None,
    };
    match decision.decision() {
        Decision::Reschedule => outcome.category = Some(Category::Reschedule),
        Decision::Cancel => outcome.category = Some(Category::Cancel),
        _ => match by_order.remove(decision.order_id()) {
            Some(OrderSlot::Classified(record, stop)) => {
                outcome.category = Some(record.category);
                outcome.reason = record.reason;
                outcome.score = Some(record.score);
                if let Some(stop) = stop {
                    outcome.vehicle = Some(stop.vehicle);
                    outcome.sequence_index = Some(stop.sequence_index);
                    outcome.arrival_minute = Some(stop.arrival_minute);
                }
            }
            Some(OrderSlot::Failed(reason)) => outcome.reason = reason,
            None => {}
        },
    }
    outcome
}
