use std::f64::consts::PI;

const EPSILON: f64 = 1e-12;
const MAX_ITERATIONS: usize = 500;

/// Upper 5% points of the chi-square distribution for 1 to 30 degrees of freedom.
static CHI_SQUARE_CRITICAL_95: [f64; 30] = [
    3.841, 5.991, 7.815, 9.488, 11.070, 12.592, 14.067, 15.507, 16.919, 18.307, 19.675, 21.026,
    22.362, 23.685, 24.996, 26.296, 27.587, 28.869, 30.144, 31.410, 32.671, 33.924, 35.172,
    36.415, 37.652, 38.885, 40.113, 41.337, 42.557, 43.773,
];

static LANCZOS: [f64; 9] = [
    0.999_999_999_999_809_9,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_1,
    -176.615_029_162_140_6,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_572e-6,
    1.505_632_735_149_311_6e-7,
];

/// Pearson's statistic, categories with a non-positive expectation are skipped.
pub fn chi_square_statistic(observed: &[f64], expected: &[f64]) -> f64 {
    observed
        .iter()
        .zip(expected)
        .filter(|(_, e)| **e > 0.)
        .map(|(o, e)| (o - e).powi(2) / e)
        .sum()
}

/// Critical value at the 5% significance level. Degrees of freedom past the table use the
/// Wilson-Hilferty approximation.
pub fn chi_square_critical_value(degrees_of_freedom: u32) -> f64 {
    match degrees_of_freedom {
        0 => 0.,
        d @ 1..=30 => CHI_SQUARE_CRITICAL_95[d as usize - 1],
        d => {
            let k = d as f64;
            let h = 2. / (9. * k);
            k * (1. - h + 1.644_853_626_951_472_2 * h.sqrt()).powi(3)
        }
    }
}

pub fn chi_square_p_value(statistic: f64, degrees_of_freedom: u32) -> f64 {
    if degrees_of_freedom == 0 || !statistic.is_finite() {
        return 0.;
    }
    if statistic <= 0. {
        return 1.;
    }
    (1. - regularized_lower_gamma(degrees_of_freedom as f64 / 2., statistic / 2.)).clamp(0., 1.)
}

pub fn ln_gamma(x: f64) -> f64 {
    if x < 0.5 {
        // Reflection
        PI.ln() - (PI * x).sin().abs().ln() - ln_gamma(1. - x)
    } else {
        let x = x - 1.;
        let t = x + 7.5;
        let series = LANCZOS
            .iter()
            .enumerate()
            .skip(1)
            .fold(LANCZOS[0], |acc, (i, c)| acc + c / (x + i as f64));
        0.5 * (2. * PI).ln() + (x + 0.5) * t.ln() - t + series.ln()
    }
}

/// P(a, x), series expansion below `a + 1` and a Lentz continued fraction above.
pub fn regularized_lower_gamma(a: f64, x: f64) -> f64 {
    if x <= 0. || a <= 0. {
        return 0.;
    }
    let log_prefix = -x + a * x.ln() - ln_gamma(a);

    if x < a + 1. {
        let mut ap = a;
        let mut term = 1. / a;
        let mut sum = term;
        for _ in 0..MAX_ITERATIONS {
            ap += 1.;
            term *= x / ap;
            sum += term;
            if term.abs() < sum.abs() * EPSILON {
                break;
            }
        }
        (sum * log_prefix.exp()).clamp(0., 1.)
    } else {
        let tiny = 1e-300;
        let mut b = x + 1. - a;
        let mut c = 1. / tiny;
        let mut d = 1. / b;
        let mut h = d;
        for i in 1..MAX_ITERATIONS {
            let i = i as f64;
            let an = -i * (i - a);
            b += 2.;
            d = an * d + b;
            if d.abs() < tiny {
                d = tiny;
            }
            c = b + an / c;
            if c.abs() < tiny {
                c = tiny;
            }
            d = 1. / d;
            let delta = d * c;
            h *= delta;
            if (delta - 1.).abs() < EPSILON {
                break;
            }
        }
        (1. - log_prefix.exp() * h).clamp(0., 1.)
    }
}

/// Largest distance between the two empirical CDFs, `None` when either sample is empty.
pub fn kolmogorov_smirnov_statistic(sample: &[f64], reference: &[f64]) -> Option<f64> {
    if sample.is_empty() || reference.is_empty() {
        return None;
    }

    let mut a = sample.to_vec();
    let mut b = reference.to_vec();
    a.sort_by(f64::total_cmp);
    b.sort_by(f64::total_cmp);

    let (n, m) = (a.len() as f64, b.len() as f64);
    let (mut i, mut j) = (0, 0);
    let mut statistic: f64 = 0.;

    while i < a.len() && j < b.len() {
        let x = a[i].min(b[j]);
        while i < a.len() && a[i] <= x {
            i += 1;
        }
        while j < b.len() && b[j] <= x {
            j += 1;
        }
        statistic = statistic.max((i as f64 / n - j as f64 / m).abs());
    }

    Some(statistic)
}

/// Asymptotic two-sample p-value with Stephens' small sample correction.
pub fn kolmogorov_smirnov_p_value(statistic: f64, n: usize, m: usize) -> f64 {
    if n == 0 || m == 0 {
        return 0.;
    }
    let effective = (n * m) as f64 / (n + m) as f64;
    let root = effective.sqrt();
    kolmogorov_survival((root + 0.12 + 0.11 / root) * statistic)
}

fn kolmogorov_survival(lambda: f64) -> f64 {
    // The alternating series converges too slowly below this and the true value rounds to one
    if lambda < 0.2 {
        return 1.;
    }
    let mut sum = 0.;
    for k in 1..=100_u32 {
        let term = (-2. * (k * k) as f64 * lambda * lambda).exp();
        sum += if k % 2 == 1 { term } else { -term };
        if term < EPSILON {
            break;
        }
    }
    (2. * sum).clamp(0., 1.)
}

/// Standard normal CDF through a Chebyshev fit of erfc, fractional error below 1.2e-7.
pub fn normal_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / std::f64::consts::SQRT_2)
}

fn erfc(x: f64) -> f64 {
    let z = x.abs();
    let t = 1. / (1. + 0.5 * z);
    let polynomial = -z * z - 1.265_512_23
        + t * (1.000_023_68
            + t * (0.374_091_96
                + t * (0.096_784_18
                    + t * (-0.186_288_06
                        + t * (0.278_868_07
                            + t * (-1.135_203_98
                                + t * (1.488_515_87 + t * (-0.822_152_23 + t * 0.170_872_77))))))));
    let r = t * polynomial.exp();
    if x >= 0. { r } else { 2. - r }
}

/// Inverse of the standard normal CDF (Acklam's rational approximation), `p` in (0, 1).
pub fn normal_quantile(p: f64) -> f64 {
    const A: [f64; 6] = [
        -3.969_683_028_665_376e1,
        2.209_460_984_245_205e2,
        -2.759_285_104_469_687e2,
        1.383_577_518_672_69e2,
        -3.066_479_806_614_716e1,
        2.506_628_277_459_239,
    ];
    const B: [f64; 5] = [
        -5.447_609_879_822_406e1,
        1.615_858_368_580_409e2,
        -1.556_989_798_598_866e2,
        6.680_131_188_771_972e1,
        -1.328_068_155_288_572e1,
    ];
    const C: [f64; 6] = [
        -7.784_894_002_430_293e-3,
        -3.223_964_580_411_365e-1,
        -2.400_758_277_161_838,
        -2.549_732_539_343_734,
        4.374_664_141_464_968,
        2.938_163_982_698_783,
    ];
    const D: [f64; 4] = [
        7.784_695_709_041_462e-3,
        3.224_671_290_700_398e-1,
        2.445_134_137_142_996,
        3.754_408_661_907_416,
    ];
    const P_LOW: f64 = 0.02425;

    if p <= 0. {
        return f64::NEG_INFINITY;
    }
    if p >= 1. {
        return f64::INFINITY;
    }

    let tail = |q: f64| {
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.)
    };

    if p < P_LOW {
        tail((-2. * p.ln()).sqrt())
    } else if p <= 1. - P_LOW {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.)
    } else {
        -tail((-2. * (1. - p).ln()).sqrt())
    }
}

/// `None` for fewer than two pairs or when either side has no variance.
pub fn pearson_correlation(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() < 2 || xs.len() != ys.len() {
        return None;
    }
    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let (mut covariance, mut var_x, mut var_y) = (0., 0., 0.);
    for (x, y) in xs.iter().zip(ys) {
        let (dx, dy) = (x - mean_x, y - mean_y);
        covariance += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x <= EPSILON || var_y <= EPSILON {
        return None;
    }
    Some((covariance / (var_x * var_y).sqrt()).clamp(-1., 1.))
}

/// Welch's unequal variance t statistic for the difference of the two means.
pub fn welch_t_statistic(a: &[f64], b: &[f64]) -> Option<f64> {
    let (mean_a, var_a) = mean_and_variance(a)?;
    let (mean_b, var_b) = mean_and_variance(b)?;
    let standard_error = (var_a / a.len() as f64 + var_b / b.len() as f64).sqrt();
    if standard_error <= EPSILON {
        return None;
    }
    Some((mean_a - mean_b) / standard_error)
}

/// Sample mean and unbiased variance, requires at least two values.
pub fn mean_and_variance(values: &[f64]) -> Option<(f64, f64)> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.);
    Some((mean, variance))
}

/// Moran's I with binary weights. `neighbors` lists each unordered adjacent pair once.
pub fn morans_i(values: &[f64], neighbors: &[(usize, usize)]) -> Option<f64> {
    let n = values.len();
    if n < 2 || neighbors.is_empty() {
        return None;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let deviations: Vec<f64> = values.iter().map(|v| v - mean).collect();
    let denominator: f64 = deviations.iter().map(|d| d * d).sum();
    if denominator <= EPSILON {
        return None;
    }

    let numerator: f64 = neighbors
        .iter()
        .filter(|(i, j)| *i < n && *j < n)
        .map(|(i, j)| 2. * deviations[*i] * deviations[*j])
        .sum();
    let total_weight = 2. * neighbors.len() as f64;

    Some(n as f64 / total_weight * numerator / denominator)
}

/// Half the L1 distance between two probability vectors, in [0, 1].
pub fn total_variation_distance(p: &[f64], q: &[f64]) -> f64 {
    let len = p.len().max(q.len());
    let at = |v: &[f64], i: usize| v.get(i).copied().unwrap_or(0.);
    ((0..len).map(|i| (at(p, i) - at(q, i)).abs()).sum::<f64>() / 2.).clamp(0., 1.)
}
