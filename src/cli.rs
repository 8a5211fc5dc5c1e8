use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use mlmetrics::metrics::SortOrder;
use mlmetrics::model::MetricKey;

#[derive(Parser, Debug)]
#[command(
    name = "mlmetrics",
    version,
    about = "Aggregate statistics for ML dashboard data"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Classification(ClassificationArgs),
    Roc(RocArgs),
    Pr(PrArgs),
    Drift(DriftArgs),
    Quality(QualityArgs),
    Confusion(ConfusionArgs),
    Attribution(AttributionArgs),
    LearningCurve(LearningCurveArgs),
}

#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Write the report here instead of stdout.
    #[arg(long)]
    pub output_path: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum MetricArg {
    Precision,
    Recall,
    F1Score,
    Support,
    Specificity,
    Accuracy,
}

impl From<MetricArg> for MetricKey {
    fn from(value: MetricArg) -> Self {
        match value {
            MetricArg::Precision => Self::Precision,
            MetricArg::Recall => Self::Recall,
            MetricArg::F1Score => Self::F1Score,
            MetricArg::Support => Self::Support,
            MetricArg::Specificity => Self::Specificity,
            MetricArg::Accuracy => Self::Accuracy,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OrderArg {
    Asc,
    Desc,
}

impl From<OrderArg> for SortOrder {
    fn from(value: OrderArg) -> Self {
        match value {
            OrderArg::Asc => Self::Asc,
            OrderArg::Desc => Self::Desc,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ClassificationArgs {
    #[arg(long)]
    pub input_path: PathBuf,

    #[arg(long, value_enum)]
    pub sort_by: Option<MetricArg>,

    #[arg(long, value_enum, default_value_t = OrderArg::Desc)]
    pub order: OrderArg,

    #[arg(long)]
    pub search: Option<String>,

    #[arg(long = "metric", value_enum)]
    pub metrics: Vec<MetricArg>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Clone)]
pub struct RocArgs {
    #[arg(long)]
    pub input_path: PathBuf,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Clone)]
pub struct PrArgs {
    #[arg(long)]
    pub input_path: PathBuf,

    #[arg(long = "isoline")]
    pub isolines: Vec<f64>,

    #[arg(long, default_value_t = false)]
    pub default_isolines: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Clone)]
pub struct DriftArgs {
    #[arg(long)]
    pub input_path: PathBuf,

    #[arg(long)]
    pub config_path: Option<PathBuf>,

    #[arg(long)]
    pub low: Option<f64>,

    #[arg(long)]
    pub medium: Option<f64>,

    #[arg(long)]
    pub high: Option<f64>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Clone)]
pub struct QualityArgs {
    #[arg(long)]
    pub input_path: PathBuf,

    #[arg(long)]
    pub config_path: Option<PathBuf>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Clone)]
pub struct ConfusionArgs {
    #[arg(long)]
    pub input_path: PathBuf,

    #[arg(long, default_value_t = false)]
    pub normalize: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum AttributionKind {
    Shap,
    Importance,
}

#[derive(Args, Debug, Clone)]
pub struct AttributionArgs {
    #[arg(long)]
    pub input_path: PathBuf,

    #[arg(long, value_enum, default_value_t = AttributionKind::Shap)]
    pub kind: AttributionKind,

    #[arg(long, default_value_t = 10)]
    pub max_features: usize,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Clone)]
pub struct LearningCurveArgs {
    #[arg(long)]
    pub input_path: PathBuf,

    #[arg(long, default_value_t = 0)]
    pub smoothing: usize,

    /// Per-layer gradient summaries to check alongside the curve.
    #[arg(long)]
    pub gradients_path: Option<PathBuf>,

    #[command(flatten)]
    pub output: OutputArgs,
}
