//! Scenario: prequential runs on the synthetic SEA stream.

use costforest_engine::{CostSensitiveForest, CostStrategy, ForestConfig};
use costforest_stream::{ImbalancedStream, InstanceStream, PrequentialEvaluation, SeaGenerator};

fn evaluation() -> PrequentialEvaluation {
    PrequentialEvaluation {
        max_instances: 3_000,
        sample_frequency: 500,
        window: 1_000,
    }
}

fn stream(seed: u64) -> ImbalancedStream<SeaGenerator> {
    let sea = SeaGenerator::new(1, seed)
        .unwrap()
        .with_drift(1_500, 4)
        .unwrap();
    ImbalancedStream::new(sea, vec![0.9, 0.1], seed).unwrap()
}

#[test]
fn picek_costs_favour_minority() {
    let mut forest = CostSensitiveForest::new(ForestConfig::small()).unwrap();
    let mut s = stream(3);
    assert_eq!(s.header().num_classes, 2);
    let report = evaluation().run(&mut forest, &mut s).unwrap();

    assert_eq!(report.curve.len(), 6);
    let costs = &report.measurements.class_costs;
    assert!(costs[1] > costs[0], "costs {costs:?}");
    assert_eq!(report.measurements.window_len(), 1_000);
}

#[test]
fn oza_run_keeps_costs_finite() {
    let cfg = ForestConfig::small().with_cost_strategy(CostStrategy::OzaCosting);
    let mut forest = CostSensitiveForest::new(cfg).unwrap();
    let report = evaluation().run(&mut forest, &mut stream(4)).unwrap();
    assert!(report
        .measurements
        .class_costs
        .iter()
        .all(|c| c.is_finite() && *c >= 0.0));
    assert!(report.summary.g_mean.is_some());
}

#[test]
fn report_serializes() {
    let mut forest = CostSensitiveForest::new(ForestConfig::small().with_ensemble_size(3)).unwrap();
    let eval = PrequentialEvaluation {
        max_instances: 200,
        sample_frequency: 100,
        window: 100,
    };
    let report = eval.run(&mut forest, &mut stream(5)).unwrap();
    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("\"curve\""));
    assert!(json.contains("\"measurements\""));
}
