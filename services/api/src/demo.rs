use crate::infra::InMemoryAssessmentRepository;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use clap::Args;
use dt_benchmark::benchmarking::domain::{
    AssessmentPayload, AssessmentRecord, CompetitiveProfile, EmotionalDistribution,
    EngagementProfile, ItemId, PillarAssessment, PillarEvidence, ProjectAnalytics, ProjectId,
    ProjectInfo, ProjectSnapshot, Recommendation,
};
use dt_benchmark::benchmarking::import::MetricImporter;
use dt_benchmark::benchmarking::scoring::{BenchmarkEngine, ScoreResult, ScoringPolicy};
use dt_benchmark::benchmarking::service::BenchmarkService;
use dt_benchmark::benchmarking::synthesis::{
    SynthesisBundle, SynthesisError, SynthesisGateway, SynthesisOutcome, SynthesisReply,
    SynthesisReport, SynthesisRequest,
};
use dt_benchmark::config::{load_policy, AppConfig};
use dt_benchmark::error::AppError;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Metric export with Category,Key,Value,Min,Max columns
    #[arg(long, conflicts_with = "snapshot", required_unless_present = "snapshot")]
    pub(crate) csv: Option<PathBuf>,
    /// JSON project snapshot (project plus records)
    #[arg(long)]
    pub(crate) snapshot: Option<PathBuf>,
    /// Project name used when scoring a CSV export
    #[arg(long, default_value = "Imported project")]
    pub(crate) project_name: String,
    /// Scoring policy JSON; falls back to BENCHMARK_POLICY_PATH, then the defaults
    #[arg(long)]
    pub(crate) policy: Option<PathBuf>,
    /// Print the score result as JSON instead of a text report
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Print synthesis payloads as JSON
    #[arg(long)]
    pub(crate) json: bool,
    /// Simulate an unreachable synthesis collaborator
    #[arg(long)]
    pub(crate) offline: bool,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        csv,
        snapshot,
        project_name,
        policy,
        json,
    } = args;

    let policy = match policy {
        Some(path) => load_policy(path)?,
        None => AppConfig::load()?.scoring,
    };

    let snapshot = match (csv, snapshot) {
        (Some(path), _) => {
            let imported = MetricImporter::from_path(&path)?;
            let project = ProjectInfo {
                id: ProjectId(slug(&project_name)),
                name: project_name,
                description: format!("Imported from {}", path.display()),
                industry: None,
                stage: None,
            };
            imported.into_snapshot(project, Utc::now())
        }
        (None, Some(path)) => read_snapshot(&path)?,
        (None, None) => {
            return Err(AppError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "either --csv or --snapshot is required",
            )))
        }
    };

    let result = BenchmarkEngine::new(policy).score(&snapshot);
    if json {
        print_json(&result);
    } else {
        render_scores(&snapshot.project, &result);
    }
    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { json, offline } = args;

    println!("Design thinking benchmark demo");
    let gateway = TemplateSynthesisGateway { offline };
    let service = BenchmarkService::new(
        Arc::new(InMemoryAssessmentRepository::default()),
        Arc::new(gateway),
        ScoringPolicy::default(),
    );

    let project = service.register_project(demo_project())?;
    let project_id = project.id.clone();

    println!("\nStep 1: synthesis before any data is recorded");
    let report = service.synthesize(&project_id).await?;
    render_synthesis(&report, json);

    println!("\nStep 2: record a DVF assessment and a lovability study");
    let start = Utc::now() - Duration::days(7);
    for record in demo_records(&project_id, start) {
        service.record(record)?;
    }
    let scores = service.scores(&project_id)?;
    render_scores(&project, &scores);

    println!("\nStep 3: add competitive and analytics data, then synthesize");
    for record in follow_up_records(&project_id, start + Duration::days(3)) {
        service.record(record)?;
    }
    let report = service.synthesize(&project_id).await?;
    render_scores(&project, &report.scores);
    render_synthesis(&report, json);

    Ok(())
}

fn demo_project() -> ProjectInfo {
    ProjectInfo {
        id: ProjectId("team-onboarding".to_string()),
        name: "Team onboarding redesign".to_string(),
        description: "Guided first-run experience for new workspaces".to_string(),
        industry: Some("Collaboration software".to_string()),
        stage: Some("prototype".to_string()),
    }
}

fn demo_records(project_id: &ProjectId, start: DateTime<Utc>) -> Vec<AssessmentRecord> {
    let pillars = PillarAssessment {
        desirability: 4.5,
        feasibility: 3.0,
        viability: 4.0,
        evidence: PillarEvidence {
            desirability: "12 of 15 interviewees asked for the guided setup".to_string(),
            feasibility: "Needs a new onboarding state machine".to_string(),
            viability: "Reduces churn in the first 30 days".to_string(),
        },
        recommendation: Recommendation::Proceed,
    };
    let engagement = EngagementProfile {
        nps: 50.0,
        satisfaction: 8.0,
        retention_rate: 70.0,
        engagement_time: 40.0,
        emotional_distribution: EmotionalDistribution {
            delight: 60.0,
            satisfaction: 20.0,
            neutral: 10.0,
            frustration: 10.0,
        },
        completion_rate: 90.0,
        error_rate: 5.0,
        support_tickets: 2,
        testing_sessions: 8,
    };

    vec![
        AssessmentRecord::new(
            project_id.clone(),
            ItemId("dvf-1".to_string()),
            start,
            AssessmentPayload::Dvf(pillars),
        ),
        AssessmentRecord::new(
            project_id.clone(),
            ItemId("lovability-1".to_string()),
            start + Duration::days(1),
            AssessmentPayload::Lovability(engagement),
        ),
    ]
}

fn follow_up_records(project_id: &ProjectId, at: DateTime<Utc>) -> Vec<AssessmentRecord> {
    let competitive = CompetitiveProfile {
        feature_ratings: BTreeMap::from([
            ("Guided setup".to_string(), 4.0),
            ("Integrations".to_string(), 3.0),
        ]),
        advantages: vec![
            "Fastest time to first value".to_string(),
            "Inline contextual help".to_string(),
        ],
        disadvantages: vec!["No SSO".to_string()],
    };

    vec![
        AssessmentRecord::new(
            project_id.clone(),
            ItemId("competitive-1".to_string()),
            at,
            AssessmentPayload::Competitive(competitive),
        ),
        AssessmentRecord::new(
            project_id.clone(),
            ItemId("analytics-1".to_string()),
            at,
            AssessmentPayload::Analytics(ProjectAnalytics {
                period: "last 30 days".to_string(),
                metrics: Vec::new(),
            }),
        ),
    ]
}

/// Offline collaborator that phrases the computed scores back as a synthesis.
struct TemplateSynthesisGateway {
    offline: bool,
}

#[async_trait]
impl SynthesisGateway for TemplateSynthesisGateway {
    async fn synthesize(
        &self,
        request: &SynthesisRequest,
    ) -> Result<SynthesisReply, SynthesisError> {
        if self.offline {
            return Err(SynthesisError::Transport(
                "demo collaborator is offline".to_string(),
            ));
        }

        let scores = &request.scores;
        let mut bundle = SynthesisBundle {
            overall_assessment: format!(
                "{} has {} with {} confidence",
                request.project.name,
                scores.sufficiency.tier.label().to_lowercase(),
                request.confidence.label().to_lowercase()
            ),
            ..SynthesisBundle::default()
        };

        if let Some(pillars) = &scores.pillars {
            bundle.key_insights.push(format!(
                "DVF overall {:.1} ({}), team decision: {}",
                pillars.overall,
                pillars.tier.label(),
                pillars.recommendation.label()
            ));
            if pillars.feasibility < pillars.desirability {
                bundle
                    .improvement_areas
                    .push("Feasibility trails desirability".to_string());
            }
        }
        if let Some(engagement) = &scores.engagement {
            bundle.key_insights.push(format!(
                "Lovability {:.1} ({})",
                engagement.overall,
                engagement.tier.label()
            ));
        }
        if let Some(competitive) = &scores.competitive {
            bundle
                .competitive_advantages
                .extend(request.categories.competitive.iter().flat_map(|profile| {
                    profile.advantages.iter().cloned()
                }));
            bundle.actionable_recommendations.push(format!(
                "Close the {} open competitive gap(s)",
                competitive.disadvantages
            ));
        }
        bundle
            .next_steps
            .push("Schedule another round of moderated testing".to_string());

        Ok(SynthesisReply::Bundle(bundle))
    }
}

fn render_scores(project: &ProjectInfo, result: &ScoreResult) {
    println!("Benchmark for {} ({})", project.name, project.id);

    match &result.pillars {
        Some(pillars) => println!(
            "- DVF: D {:.1} / F {:.1} / V {:.1} -> {:.1} ({}) | decision {}",
            pillars.desirability,
            pillars.feasibility,
            pillars.viability,
            pillars.overall,
            pillars.tier.label(),
            pillars.recommendation.label()
        ),
        None => println!("- DVF: no assessment recorded"),
    }

    match &result.engagement {
        Some(engagement) => println!(
            "- Lovability: {:.1} ({}) | emotional {:.1}, metrics {:.1}, behavior {:.1}",
            engagement.overall,
            engagement.tier.label(),
            engagement.emotional,
            engagement.metrics,
            engagement.behavior
        ),
        None => println!("- Lovability: no metrics recorded"),
    }

    match &result.competitive {
        Some(competitive) => println!(
            "- Competitiveness: {:.1} | avg feature {:.1}, +{:.1} advantages, -{:.1} gaps",
            competitive.competitiveness,
            competitive.average_feature,
            competitive.advantage_bonus,
            competitive.gap_penalty
        ),
        None => println!("- Competitiveness: no analysis recorded"),
    }

    let sufficiency = &result.sufficiency;
    println!(
        "- Data: {} record(s) -> {}% ({})",
        sufficiency.total,
        sufficiency.percent,
        sufficiency.tier.label()
    );
}

fn render_synthesis(report: &SynthesisReport, json: bool) {
    if json {
        print_json(report);
        return;
    }

    println!(
        "Synthesis [{}] confidence {}",
        report.outcome.label(),
        report.confidence.label()
    );
    match &report.outcome {
        SynthesisOutcome::Ready { synthesis } => {
            println!("  {}", synthesis.overall_assessment);
            for insight in &synthesis.key_insights {
                println!("  - {}", insight);
            }
            for step in &synthesis.next_steps {
                println!("  next: {}", step);
            }
        }
        SynthesisOutcome::InsufficientData => {
            println!("  Record at least one assessment before requesting a synthesis");
        }
        SynthesisOutcome::Unavailable { reason, retryable } => {
            let hint = if *retryable { "retry later" } else { "not retryable" };
            println!("  Unavailable: {} ({})", reason, hint);
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(err) => println!("JSON output unavailable: {}", err),
    }
}

fn read_snapshot(path: &Path) -> Result<ProjectSnapshot, AppError> {
    let file = std::fs::File::open(path)?;
    serde_json::from_reader(std::io::BufReader::new(file)).map_err(|err| {
        AppError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("{} is not a valid project snapshot: {}", path.display(), err),
        ))
    })
}

fn slug(name: &str) -> String {
    let slug = name
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() {
        "project".to_string()
    } else {
        slug
    }
}
