use chrono::{TimeZone, Utc};
use dt_benchmark::benchmarking::domain::{ItemType, ProjectId, ProjectInfo, Recommendation};
use dt_benchmark::benchmarking::import::{MetricImportError, MetricImporter};
use dt_benchmark::benchmarking::scoring::{BenchmarkEngine, LovabilityTier, PillarTier};
use dt_benchmark::benchmarking::sufficiency::DataSufficiency;
use std::io::{Cursor, Write};

const EXPORT: &str = "Category,Key,Value,Min,Max
DVF,Desirability,4.5,,
DVF,Feasibility,3.0,,
DVF,Viability,4.0,,
DVF,Recommendation,Modify,,
Lovability,NPS,50,,
Lovability,Satisfaction,8,,
Lovability,Retention\u{200b} Rate,70%,,
Lovability,Engagement Time,40,,
Lovability,Completion Rate,90,,
Lovability,Error Rate,5,,
Lovability,Support Tickets,2,,
Emotional Distribution,Delight,60,,
Emotional Distribution,Satisfaction,20,,
Emotional Distribution,Neutral,10,,
Emotional Distribution,Frustration,10,,
Feature,Guided setup,4,,
Feature,Integrations,3,,
Advantage,Fastest time to first value,,,
Advantage,Inline help,,,
Disadvantage,No SSO yet,,,
Analytics,Period,2024-Q1,,
Analytics,Weekly active teams,  140 ,0,
";

fn project() -> ProjectInfo {
    ProjectInfo {
        id: ProjectId("onboarding".to_string()),
        name: "Onboarding".to_string(),
        description: String::new(),
        industry: None,
        stage: None,
    }
}

#[test]
fn export_builds_a_fully_scored_snapshot() {
    let imported = MetricImporter::from_reader(Cursor::new(EXPORT)).expect("export imports");
    let recorded_at = Utc
        .with_ymd_and_hms(2024, 4, 1, 8, 30, 0)
        .single()
        .expect("valid timestamp");

    let snapshot = imported.into_snapshot(project(), recorded_at);
    let inventory = snapshot.inventory();
    for item_type in ItemType::ordered() {
        assert_eq!(inventory.count(item_type), 1, "{}", item_type.label());
    }

    let result = BenchmarkEngine::default().score(&snapshot);

    let pillars = result.pillars.expect("pillar score");
    assert_eq!(pillars.overall, 3.8);
    assert_eq!(pillars.tier, PillarTier::Moderate);
    assert_eq!(pillars.recommendation, Recommendation::Modify);

    let engagement = result.engagement.expect("engagement score");
    assert_eq!(engagement.overall, 6.0);
    assert_eq!(engagement.tier, LovabilityTier::Good);

    let competitive = result.competitive.expect("competitive score");
    assert_eq!(competitive.advantages, 2);
    assert_eq!(competitive.disadvantages, 1);
    assert_eq!(competitive.competitiveness, 7.7);

    assert_eq!(result.sufficiency.total, 4);
    assert_eq!(result.sufficiency.tier, DataSufficiency::Partial);
}

#[test]
fn analytics_rows_keep_their_raw_text() {
    let imported = MetricImporter::from_reader(Cursor::new(EXPORT)).expect("export imports");
    let analytics = imported.analytics.expect("analytics present");

    assert_eq!(analytics.period, "2024-Q1");
    assert_eq!(analytics.metrics.len(), 1);
    let metric = &analytics.metrics[0];
    assert_eq!(metric.key, "Weekly active teams");
    assert_eq!(metric.min, 0.0);
    assert_eq!(metric.normalized(), 140.0);
}

#[test]
fn partial_export_only_creates_populated_records() {
    let csv = "Category,Key,Value\nFeature,Offline mode,5\n";

    let imported = MetricImporter::from_reader(Cursor::new(csv)).expect("export imports");
    let snapshot = imported.into_snapshot(project(), Utc::now());

    assert_eq!(snapshot.inventory().total(), 1);
    assert_eq!(snapshot.inventory().count(ItemType::Competitive), 1);
}

#[test]
fn from_path_reads_exports_from_disk() {
    let file_name = format!("dt-benchmark-import-{}.csv", std::process::id());
    let path = std::env::temp_dir().join(file_name);
    {
        let mut file = std::fs::File::create(&path).expect("temp file created");
        file.write_all(EXPORT.as_bytes()).expect("export written");
    }

    let imported = MetricImporter::from_path(&path).expect("export imports");
    assert!(imported.pillars.is_some());

    let _ = std::fs::remove_file(&path);
}

#[test]
fn missing_file_is_an_io_error() {
    let err = MetricImporter::from_path("/nonexistent/dt-benchmark/export.csv")
        .expect_err("missing file fails");

    assert!(matches!(err, MetricImportError::Io(_)));
}
