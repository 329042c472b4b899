use std::fmt;

use thiserror::Error;

/// Why a least-squares line could not be fitted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegressionError {
    #[error("x has {x} values but y has {y}")]
    LengthMismatch { x: usize, y: usize },
    #[error("need at least 2 points to fit a line, got {0}")]
    TooFewPoints(usize),
    #[error("all x values are equal ({0}); the slope is undefined")]
    ConstantX(f64),
    #[error("input contains a non-finite value")]
    NonFinite,
    #[error("values are too large or too close together to fit in f64 precision")]
    Overflow,
}

/// Best-fit line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Pearson correlation coefficient of x and y.
    pub r_value: f64,
    /// Number of points the line was fitted to.
    pub n: usize,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    pub fn r_squared(&self) -> f64 {
        self.r_value * self.r_value
    }
}

impl fmt::Display for LinearFit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "y = {:.4}x {} {:.4} (r² = {:.4}, n = {})",
            self.slope,
            if self.intercept < 0.0 { '-' } else { '+' },
            self.intercept.abs(),
            self.r_squared(),
            self.n
        )
    }
}

/// Ordinary least-squares fit of `y` against `x`.
///
/// `slope = Sxy / Sxx`, `intercept = mean(y) - slope * mean(x)`.
pub fn fit(x: &[f64], y: &[f64]) -> Result<LinearFit, RegressionError> {
    if x.len() != y.len() {
        return Err(RegressionError::LengthMismatch {
            x: x.len(),
            y: y.len(),
        });
    }
    let n = x.len();
    if n < 2 {
        return Err(RegressionError::TooFewPoints(n));
    }
    if x.iter().chain(y).any(|v| !v.is_finite()) {
        return Err(RegressionError::NonFinite);
    }
    if x.iter().all(|&v| v == x[0]) {
        return Err(RegressionError::ConstantX(x[0]));
    }

    let mean_x = x.iter().sum::<f64>() / n as f64;
    let mean_y = y.iter().sum::<f64>() / n as f64;

    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }

    // Distinct x values whose squared deviations underflow.
    if sxx == 0.0 {
        return Err(RegressionError::ConstantX(mean_x));
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    // Constant y: the line is flat and there is no correlation to report.
    let r_value = if syy == 0.0 {
        0.0
    } else {
        (sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0)
    };

    let sums = [mean_x, mean_y, sxx, syy, sxy];
    if sums
        .iter()
        .chain([&slope, &intercept, &r_value])
        .any(|v| !v.is_finite())
    {
        return Err(RegressionError::Overflow);
    }

    Ok(LinearFit {
        slope,
        intercept,
        r_value,
        n,
    })
}
