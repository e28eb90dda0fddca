//! Text reports: model scores and coefficient bar charts.

use serde::Serialize;
use std::fmt;

/// R² of the three models on the train and test splits.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScoreReport {
    pub raw_train: f64,
    pub raw_test: f64,
    pub cv_train: f64,
    pub cv_test: f64,
    pub no_cv_train: f64,
    pub no_cv_test: f64,
}

impl ScoreReport {
    /// Test score lost by encoding without cross fitting.
    pub fn no_cv_generalization_gap(&self) -> f64 {
        self.no_cv_train - self.no_cv_test
    }
}

impl fmt::Display for ScoreReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Raw Model score on training set: {:.3}", self.raw_train)?;
        writeln!(f, "Raw Model score on test set: {:.3}", self.raw_test)?;
        writeln!(f, "Model with CV on training set: {:.3}", self.cv_train)?;
        writeln!(f, "Model with CV on test set: {:.3}", self.cv_test)?;
        writeln!(f, "Model without CV on training set: {:.3}", self.no_cv_train)?;
        write!(f, "Model without CV on test set: {:.3}", self.no_cv_test)
    }
}

/// Named coefficients rendered as a horizontal bar chart, smallest first.
#[derive(Clone, Debug, Serialize)]
pub struct CoefficientChart {
    pub title: String,
    pub bars: Vec<(String, f64)>,
    #[serde(skip)]
    width: usize,
}

impl CoefficientChart {
    /// Pairs `names` with `coefficients` and sorts the bars ascending.
    pub fn new<S: Into<String>>(title: S, names: &[String], coefficients: &[f64]) -> Self {
        let mut bars: Vec<(String, f64)> = names
            .iter()
            .cloned()
            .zip(coefficients.iter().copied())
            .collect();
        bars.sort_by(|a, b| a.1.total_cmp(&b.1));
        Self {
            title: title.into(),
            bars,
            width: 40,
        }
    }

    /// Maximum bar length in characters on each side of the axis.
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width.max(1);
        self
    }

    fn bar_len(&self, value: f64, max_abs: f64) -> usize {
        if max_abs == 0.0 {
            0
        } else {
            (value.abs() / max_abs * self.width as f64).round() as usize
        }
    }
}

impl fmt::Display for CoefficientChart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        let label_width = self.bars.iter().map(|(n, _)| n.len()).max().unwrap_or(0);
        let max_abs = self.bars.iter().fold(0.0f64, |m, (_, v)| m.max(v.abs()));
        let has_negative = self.bars.iter().any(|(_, v)| *v < 0.0);

        for (name, value) in &self.bars {
            let len = self.bar_len(*value, max_abs);
            write!(f, "{:>w$} ", name, w = label_width)?;
            if has_negative {
                if *value < 0.0 {
                    write!(f, "{:>w$}|", "#".repeat(len), w = self.width)?;
                } else {
                    write!(f, "{:w$}|{}", "", "#".repeat(len), w = self.width)?;
                }
            } else {
                write!(f, "|{}", "#".repeat(len))?;
            }
            writeln!(f, " {:.4}", value)?;
        }
        Ok(())
    }
}
