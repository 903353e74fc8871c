use super::common::*;
use crate::benchmarking::domain::{
    AssessmentPayload, DataInventory, PillarAssessment, ProjectSnapshot, Recommendation,
};
use crate::benchmarking::scoring::{
    BenchmarkEngine, LovabilityTier, PillarTier, ScoringPolicy, SufficiencyThresholds,
};
use crate::benchmarking::sufficiency::DataSufficiency;

fn approx(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 0.01,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn scenario_a_pillars_average_to_moderate() {
    let engine = BenchmarkEngine::default();

    let score = engine.score_pillars(&scenario_a_pillars());

    assert_eq!(score.overall, 3.8);
    assert_eq!(score.tier, PillarTier::Moderate);
    assert_eq!(score.tier.label(), "moderate");
}

#[test]
fn scenario_b_engagement_lands_in_good_tier() {
    let engine = BenchmarkEngine::default();

    let score = engine.score_engagement(&scenario_b_profile());

    // 330 weighted points over a 100-point distribution.
    approx(score.emotional, 3.3);
    approx(score.metrics, 5.96);
    approx(score.behavior, 8.83);
    assert_eq!(score.overall, 6.0);
    assert_eq!(score.tier, LovabilityTier::Good);
}

#[test]
fn human_recommendation_survives_scoring() {
    let engine = BenchmarkEngine::default();
    let assessment = PillarAssessment {
        recommendation: Recommendation::Stop,
        ..PillarAssessment::new(5.0, 5.0, 5.0)
    };

    let score = engine.score_pillars(&assessment);

    assert_eq!(score.tier, PillarTier::Strong);
    assert_eq!(score.recommendation, Recommendation::Stop);
}

#[test]
fn snapshot_scores_use_latest_record_per_category() {
    let engine = BenchmarkEngine::default();
    let snapshot = ProjectSnapshot::new(project())
        .with_record(
            "dvf-early",
            at(1),
            AssessmentPayload::Dvf(PillarAssessment::new(1.0, 1.0, 1.0)),
        )
        .with_record("dvf-late", at(5), AssessmentPayload::Dvf(scenario_a_pillars()))
        .with_record(
            "competitive-1",
            at(2),
            AssessmentPayload::Competitive(competitive_profile()),
        );

    let result = engine.score(&snapshot);

    assert_eq!(result.pillars.expect("pillar score").overall, 3.8);
    assert_eq!(
        result.competitive.expect("competitive score").competitiveness,
        7.7
    );
    assert!(result.engagement.is_none());
    assert_eq!(result.sufficiency.total, 3);
    assert_eq!(result.sufficiency.tier, DataSufficiency::Partial);
}

#[test]
fn rescoring_reflects_every_change_to_the_snapshot() {
    let engine = BenchmarkEngine::default();
    let base = ProjectSnapshot::new(project()).with_record(
        "dvf-1",
        at(1),
        AssessmentPayload::Dvf(scenario_a_pillars()),
    );

    let first = engine.score(&base);
    let again = engine.score(&base);
    assert_eq!(first, again);

    let edited = ProjectSnapshot::new(project()).with_record(
        "dvf-1",
        at(1),
        AssessmentPayload::Dvf(PillarAssessment::new(5.0, 4.5, 4.0)),
    );
    let rescored = engine.score(&edited);
    assert_eq!(rescored.pillars.expect("pillar score").tier, PillarTier::Strong);
}

#[test]
fn inventory_with_three_records_permits_medium_synthesis() {
    let engine = BenchmarkEngine::default();
    let inventory = DataInventory {
        dvf_assessments: 2,
        lovability_metrics: 1,
        project_analytics: 0,
        competitive_analyses: 0,
    };

    let report = engine.assess_sufficiency(inventory);

    assert_eq!(report.total, 3);
    assert_eq!(report.percent, 50);
    assert_eq!(report.tier.label(), "Moderate Data");
}

#[test]
fn custom_policy_thresholds_shift_tiers() {
    let policy = ScoringPolicy {
        sufficiency: SufficiencyThresholds {
            complete: 4,
            substantial: 3,
            partial: 2,
            minimal: 1,
        },
        ..ScoringPolicy::default()
    };
    policy.validate().expect("policy is valid");
    let engine = BenchmarkEngine::new(policy);

    let report = engine.assess_sufficiency(DataInventory {
        dvf_assessments: 4,
        ..DataInventory::default()
    });

    assert_eq!(report.tier, DataSufficiency::Complete);
}
