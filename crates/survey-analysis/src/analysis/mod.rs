//! Association analyses answering the three research questions.
//!
//! Each question is data: the column pair, the test to run, chart text and
//! the two interpretation sentences. [`AssociationAnalyzer`] aggregates,
//! charts, tests and interprets one question at a time.

mod anova;
mod chi_square;
mod contingency;

pub use anova::{AnovaRow, AnovaTable, GroupedValues, RESIDUAL_ROW, one_way_anova};
pub use chi_square::{ChiSquareResult, chi_square_test};
pub use contingency::ContingencyTable;

use crate::charts::{BoxPlotChart, Chart, ChartLabels, StackedBarChart};
use crate::error::{Result, ResultExt};
use crate::schema::{AGE, GENDER, MENTAL_HEALTH_CONDITION, SATISFACTION_WITH_REMOTE_WORK, WORK_LOCATION};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Outcome of comparing a p-value against the significance level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Significance {
    Significant,
    NotSignificant,
}

/// `p > alpha` is not significant; anything else is.
pub fn classify(p_value: f64, alpha: f64) -> Significance {
    if p_value > alpha {
        Significance::NotSignificant
    } else {
        Significance::Significant
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestKind {
    /// Cross-tabulate two categorical columns, stacked bars, chi-squared.
    Independence,
    /// Numeric column by categorical column, box plot, one-way ANOVA.
    MeanDifference,
}

/// A fixed research question.
#[derive(Debug, Clone, Copy)]
pub struct ResearchQuestion {
    pub id: &'static str,
    pub description: &'static str,
    /// Row variable of the cross-tabulation, or the numeric variable.
    pub primary: &'static str,
    /// Column variable of the cross-tabulation, or the grouping variable.
    pub secondary: &'static str,
    pub kind: TestKind,
    pub chart: ChartLabels<'static>,
    pub not_significant: &'static str,
    pub significant: &'static str,
}

impl ResearchQuestion {
    pub fn interpret(&self, significance: Significance) -> &'static str {
        match significance {
            Significance::Significant => self.significant,
            Significance::NotSignificant => self.not_significant,
        }
    }
}

pub const WORK_LOCATION_VS_MENTAL_HEALTH: ResearchQuestion = ResearchQuestion {
    id: "A",
    description: "Relación entre localización del trabajo y salud mental",
    primary: WORK_LOCATION,
    secondary: MENTAL_HEALTH_CONDITION,
    kind: TestKind::Independence,
    chart: ChartLabels {
        title: "Salud Mental y Localización del Trabajo",
        x_label: "Localización del Trabajo",
        y_label: "Número de Empleados",
        legend: Some("Condiciones de Salud Mental"),
    },
    not_significant: "No hay evidencia suficiente para afirmar que existe una relación significativa entre la localización del trabajo y las condiciones de salud mental.",
    significant: "Existe una relación significativa entre la localización del trabajo y las condiciones de salud mental.",
};

pub const GENDER_VS_SATISFACTION: ResearchQuestion = ResearchQuestion {
    id: "B",
    description: "Relación entre género y satisfacción con el trabajo remoto",
    primary: GENDER,
    secondary: SATISFACTION_WITH_REMOTE_WORK,
    kind: TestKind::Independence,
    chart: ChartLabels {
        title: "Género y Satisfacción con el Trabajo Remoto",
        x_label: "Género",
        y_label: "Número de Empleados",
        legend: Some("Satisfacción con Trabajo Remoto"),
    },
    not_significant: "No hay evidencia suficiente para afirmar que existe una relación significativa entre el género y la satisfacción con el trabajo remoto.",
    significant: "Existe una relación significativa entre el género y la satisfacción con el trabajo remoto.",
};

pub const AGE_BY_SATISFACTION: ResearchQuestion = ResearchQuestion {
    id: "C",
    description: "Diferencias de edad según la satisfacción con el trabajo remoto",
    primary: AGE,
    secondary: SATISFACTION_WITH_REMOTE_WORK,
    kind: TestKind::MeanDifference,
    chart: ChartLabels {
        title: "Distribución de la Edad según la Satisfacción con el Trabajo Remoto",
        x_label: "Satisfacción con el Trabajo Remoto",
        y_label: "Edad",
        legend: None,
    },
    not_significant: "No hay evidencia suficiente para afirmar que las edades difieren significativamente entre los niveles de satisfacción con el trabajo remoto.",
    significant: "Hay evidencia suficiente para concluir que las edades difieren significativamente entre los niveles de satisfacción con el trabajo remoto.",
};

/// The three questions, in the order they are answered.
pub const RESEARCH_QUESTIONS: [ResearchQuestion; 3] = [
    WORK_LOCATION_VS_MENTAL_HEALTH,
    GENDER_VS_SATISFACTION,
    AGE_BY_SATISFACTION,
];

/// Number of values per group of a [`TestOutcome::Anova`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSize {
    pub label: String,
    pub count: usize,
}

/// Statistics computed for one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "test", rename_all = "snake_case")]
pub enum TestOutcome {
    ChiSquare {
        table: ContingencyTable,
        result: ChiSquareResult,
    },
    Anova {
        groups: Vec<GroupSize>,
        table: AnovaTable,
    },
}

impl TestOutcome {
    pub fn p_value(&self) -> f64 {
        match self {
            TestOutcome::ChiSquare { result, .. } => result.p_value,
            TestOutcome::Anova { table, .. } => table.p_value(),
        }
    }

    pub fn statistic(&self) -> f64 {
        match self {
            TestOutcome::ChiSquare { result, .. } => result.statistic,
            TestOutcome::Anova { table, .. } => table.f_statistic(),
        }
    }
}

/// Answer to one research question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOutcome {
    pub question_id: String,
    pub description: String,
    pub test: TestOutcome,
    pub chart: Chart,
    pub significance_level: f64,
    pub significance: Significance,
    pub interpretation: String,
}

/// Runs research questions against the deduplicated table.
#[derive(Debug, Clone)]
pub struct AssociationAnalyzer {
    significance_level: f64,
    yates_correction: bool,
}

impl Default for AssociationAnalyzer {
    fn default() -> Self {
        Self {
            significance_level: 0.05,
            yates_correction: true,
        }
    }
}

impl AssociationAnalyzer {
    pub fn new(significance_level: f64, yates_correction: bool) -> Self {
        Self {
            significance_level,
            yates_correction,
        }
    }

    /// Answer every question in [`RESEARCH_QUESTIONS`].
    pub fn run_all(&self, df: &DataFrame) -> Result<Vec<AnalysisOutcome>> {
        RESEARCH_QUESTIONS
            .iter()
            .map(|question| self.run(df, question))
            .collect()
    }

    /// Aggregate, chart, test and interpret one question.
    pub fn run(&self, df: &DataFrame, question: &ResearchQuestion) -> Result<AnalysisOutcome> {
        let context = format!("Analysis {}", question.id);

        let (test, chart) = match question.kind {
            TestKind::Independence => {
                let table = ContingencyTable::from_columns(df, question.primary, question.secondary)
                    .context(context.clone())?;
                let chart = Chart::StackedBar(StackedBarChart::from_table(&table, question.chart));
                let result = chi_square_test(&table, self.yates_correction).context(context)?;
                (TestOutcome::ChiSquare { table, result }, chart)
            }
            TestKind::MeanDifference => {
                let data = GroupedValues::from_columns(df, question.primary, question.secondary)
                    .context(context.clone())?;
                let chart = Chart::BoxPlot(BoxPlotChart::from_groups(&data, question.chart));
                let table = one_way_anova(&data).context(context)?;
                let groups = data
                    .groups
                    .iter()
                    .map(|(label, values)| GroupSize {
                        label: label.clone(),
                        count: values.len(),
                    })
                    .collect();
                (TestOutcome::Anova { groups, table }, chart)
            }
        };

        let significance = classify(test.p_value(), self.significance_level);
        info!(
            "Analysis {}: statistic = {:.4}, p = {:.4} ({:?})",
            question.id,
            test.statistic(),
            test.p_value(),
            significance
        );

        Ok(AnalysisOutcome {
            question_id: question.id.to_string(),
            description: question.description.to_string(),
            test,
            chart,
            significance_level: self.significance_level,
            significance,
            interpretation: question.interpret(significance).to_string(),
        })
    }
}
