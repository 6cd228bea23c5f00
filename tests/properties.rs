use std::collections::HashMap;

use proptest::prelude::*;

use u_dispatch::allocation::WindowAllocator;
use u_dispatch::config::{AllocationSettings, SolverSettings};
use u_dispatch::disposition::ScoringModel;
use u_dispatch::distance::TimeMatrix;
use u_dispatch::models::{Category, Decision, DeliveryWindow, Order, PriorityTag, TripProblem};
use u_dispatch::solver::RouteSolver;

fn windows() -> Vec<DeliveryWindow> {
    [9, 11, 13]
        .into_iter()
        .map(|h| DeliveryWindow::from_hm(h, 0, h + 2, 0).expect("valid window"))
        .collect()
}

#[derive(Debug, Clone)]
struct OrderInput {
    units: i32,
    window: usize,
    early: bool,
    priority: bool,
    prior: u32,
}

fn order_input() -> impl Strategy<Value = OrderInput> {
    (1i32..=130, 0usize..3, any::<bool>(), prop::bool::weighted(0.2), 0u32..4).prop_map(
        |(units, window, early, priority, prior)| OrderInput {
            units,
            window,
            early,
            priority,
            prior,
        },
    )
}

fn build_orders(inputs: &[OrderInput], windows: &[DeliveryWindow]) -> Vec<Order> {
    inputs
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let mut order = Order::new(format!("O{i}"), s.units, windows[s.window])
                .with_early_delivery(s.early)
                .with_prior_reschedules(s.prior);
            if s.priority {
                order = order.with_priority(PriorityTag::Vip);
            }
            order
        })
        .collect()
}

fn capacity_map(windows: &[DeliveryWindow], caps: &[i32]) -> HashMap<String, i32> {
    windows.iter().zip(caps).map(|(w, &c)| (w.label(), c)).collect()
}

proptest! {
    #[test]
    fn allocation_covers_every_order_once(
        inputs in prop::collection::vec(order_input(), 0..30),
        caps in prop::collection::vec(0i32..=150, 3),
    ) {
        let ws = windows();
        let orders = build_orders(&inputs, &ws);
        let outcome = WindowAllocator::default()
            .allocate(&orders, &ws, &capacity_map(&ws, &caps))
            .expect("valid input");

        prop_assert_eq!(outcome.decisions().len(), orders.len());
        let mut seen: HashMap<&str, usize> = HashMap::new();
        for wo in outcome.windows() {
            for o in wo.orders() {
                *seen.entry(o.id()).or_default() += 1;
                let d = outcome.decision_for(o.id()).expect("decision");
                prop_assert_eq!(d.assigned_window(), Some(wo.window()));
            }
        }
        for (order, d) in orders.iter().zip(outcome.decisions()) {
            prop_assert_eq!(order.id(), d.order_id());
            let placed = seen.get(order.id()).copied().unwrap_or(0);
            prop_assert_eq!(placed, usize::from(d.decision().is_assigned()));
            prop_assert!(!d.reason().is_empty());
        }
    }

    #[test]
    fn priority_orders_keep_their_window(
        inputs in prop::collection::vec(order_input(), 0..30),
        caps in prop::collection::vec(0i32..=150, 3),
    ) {
        let ws = windows();
        let orders = build_orders(&inputs, &ws);
        let settings = AllocationSettings::default();
        let outcome = WindowAllocator::new(settings.clone())
            .allocate(&orders, &ws, &capacity_map(&ws, &caps))
            .expect("valid input");
        for (order, d) in orders.iter().zip(outcome.decisions()) {
            if order.is_priority() && order.units() <= settings.reschedule_threshold {
                prop_assert_eq!(d.decision(), Decision::KeepWindow);
                prop_assert_eq!(d.assigned_window(), Some(order.original_window()));
            }
        }
    }

    #[test]
    fn early_moves_stay_within_bound(
        inputs in prop::collection::vec(order_input(), 0..30),
        caps in prop::collection::vec(0i32..=150, 3),
    ) {
        let ws = windows();
        let orders = build_orders(&inputs, &ws);
        let outcome = WindowAllocator::default()
            .allocate(&orders, &ws, &capacity_map(&ws, &caps))
            .expect("valid input");
        for d in outcome.decisions() {
            if d.decision() == Decision::MovedEarly {
                let assigned = d.assigned_window().expect("assigned");
                let hours = assigned.hours_until(d.original_window());
                prop_assert!(hours > 0.0 && hours <= 6.0);
            }
        }
    }

    #[test]
    fn size_thresholds_are_deterministic(
        inputs in prop::collection::vec(order_input(), 0..20),
        caps in prop::collection::vec(0i32..=500, 3),
    ) {
        let ws = windows();
        let settings = AllocationSettings::default();
        let mut orders = build_orders(&inputs, &ws);
        orders.push(Order::new("huge", settings.cancel_threshold + 1, ws[1]));
        orders.push(Order::new("edge", settings.reschedule_threshold, ws[1]));
        let outcome = WindowAllocator::new(settings)
            .allocate(&orders, &ws, &capacity_map(&ws, &caps))
            .expect("valid input");
        let huge = outcome.decision_for("huge").expect("decision");
        prop_assert_eq!(huge.decision(), Decision::Cancel);
        let edge = outcome.decision_for("edge").expect("decision");
        prop_assert!(!edge.reason().contains("exceeds reschedule threshold"));
    }

    #[test]
    fn scores_fall_with_distance(
        units in 1i32..200,
        a in 0.0f64..60.0,
        b in 0.0f64..60.0,
    ) {
        let model = ScoringModel::default();
        let (near, far) = if a <= b { (a, b) } else { (b, a) };
        for category in Category::ALL {
            prop_assert!(model.score(category, near, units) >= model.score(category, far, units));
        }
    }
}

#[derive(Debug, Clone)]
struct TripInput {
    times: Vec<i64>,
    demands: Vec<i32>,
    service: Vec<i64>,
    n: usize,
    capacity: i32,
    max_minutes: i64,
    vehicles: usize,
}

fn trip_input() -> impl Strategy<Value = TripInput> {
    (2usize..8).prop_flat_map(|n| {
        (
            prop::collection::vec(1i64..30, n * n),
            prop::collection::vec(1i32..40, n),
            prop::collection::vec(0i64..6, n),
            20i32..100,
            20i64..150,
            1usize..=2,
        )
            .prop_map(move |(times, demands, service, capacity, max_minutes, vehicles)| TripInput {
                times,
                demands,
                service,
                n,
                capacity,
                max_minutes,
                vehicles,
            })
    })
}

fn build_problem(input: &TripInput) -> TripProblem {
    let mut tm = TimeMatrix::from_data(input.n, input.times.clone()).expect("square");
    for i in 0..input.n {
        tm.set(i, i, 0);
    }
    let mut demands = input.demands.clone();
    demands[0] = 0;
    let mut service = input.service.clone();
    service[0] = 0;
    TripProblem::new(tm, demands, service, input.capacity, input.max_minutes, input.vehicles)
        .expect("valid problem")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn solver_respects_capacity_time_and_completeness(input in trip_input()) {
        let problem = build_problem(&input);
        let settings = SolverSettings {
            max_iterations: Some(60),
            ..SolverSettings::default()
        };
        let plan = RouteSolver::new(settings).solve(&problem);

        let mut nodes = plan.kept_nodes();
        nodes.extend_from_slice(plan.dropped());
        nodes.sort_unstable();
        prop_assert_eq!(nodes, problem.order_nodes().collect::<Vec<_>>());

        prop_assert!(plan.routes().len() <= input.vehicles);
        for route in plan.routes() {
            let load: i32 = route.nodes().iter().map(|&n| problem.demand(n)).sum();
            prop_assert!(load <= input.capacity);
            prop_assert!(route.total_minutes() <= input.max_minutes);
            let mut last = 0;
            for (seq, visit) in route.visits().iter().enumerate() {
                prop_assert_eq!(visit.sequence_index, seq);
                prop_assert!(visit.arrival_minute >= last);
                last = visit.arrival_minute;
            }
        }
    }
}
