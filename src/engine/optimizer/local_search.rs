// ==========================================
// 有界局部下降
// ==========================================
// 投影梯度 + Armijo 回溯, 坐标盒为 [0, 1]^n
// 梯度用中心差分; 贴边时退化为单侧差分
// ==========================================

use super::outcome::SearchOutcome;
use crate::config::LocalSearchConfig;

/// Armijo 充分下降系数
const ARMIJO_C: f64 = 1e-4;
/// 最小步长（归一化坐标）
const MIN_STEP: f64 = 1e-12;

/// 从 x0 出发做有界局部下降
///
/// # 收敛判据
/// - 投影梯度范数 ≤ gtol
/// - 相对目标值变化 ≤ ftol
/// - 回溯后步长低于 MIN_STEP（无法再下降）
///
/// 达到 max_iterations 时 success = false
pub(crate) fn minimize<F>(f: F, x0: &[f64], cfg: &LocalSearchConfig) -> SearchOutcome
where
    F: Fn(&[f64]) -> f64,
{
    let mut x: Vec<f64> = x0.iter().map(|v| v.clamp(0.0, 1.0)).collect();
    let mut fx = f(&x);
    let mut evaluations = 1u64;

    if x.is_empty() {
        return SearchOutcome {
            x,
            fun: fx,
            iterations: 0,
            evaluations,
            success: true,
            message: "no free dimensions; evaluated fixed point".to_string(),
        };
    }

    for iteration in 1..=cfg.max_iterations {
        let g = gradient(&f, &x, cfg.fd_step);
        evaluations += 2 * x.len() as u64;

        // 投影下降方向: 贴边且梯度指向外侧的分量置零
        let d: Vec<f64> = x
            .iter()
            .zip(&g)
            .map(|(&xi, &gi)| {
                if (xi <= 0.0 && gi > 0.0) || (xi >= 1.0 && gi < 0.0) || !gi.is_finite() {
                    0.0
                } else {
                    -gi
                }
            })
            .collect();

        let pg_norm = d.iter().map(|v| v * v).sum::<f64>().sqrt();
        if pg_norm <= cfg.gtol {
            return SearchOutcome {
                x,
                fun: fx,
                iterations: iteration,
                evaluations,
                success: true,
                message: "projected gradient below gtol".to_string(),
            };
        }

        // 初始步长使最大分量恰好跨越整个区间
        let d_max = d.iter().fold(0.0f64, |m, v| m.max(v.abs()));
        let mut step = 1.0 / d_max;
        let mut accepted = None;
        while step * d_max >= MIN_STEP {
            let candidate: Vec<f64> = x
                .iter()
                .zip(&d)
                .map(|(xi, di)| (xi + step * di).clamp(0.0, 1.0))
                .collect();
            let f_candidate = f(&candidate);
            evaluations += 1;

            let decrease: f64 = g
                .iter()
                .zip(candidate.iter().zip(&x))
                .map(|(gi, (ci, xi))| gi * (ci - xi))
                .sum();
            if f_candidate <= fx + ARMIJO_C * decrease {
                accepted = Some((candidate, f_candidate));
                break;
            }
            step *= 0.5;
        }

        let Some((x_new, f_new)) = accepted else {
            return SearchOutcome {
                x,
                fun: fx,
                iterations: iteration,
                evaluations,
                success: true,
                message: "line search step below tolerance".to_string(),
            };
        };

        let delta = (fx - f_new).abs();
        x = x_new;
        let f_prev = fx;
        fx = f_new;
        if delta <= cfg.ftol * f_prev.abs().max(1.0) {
            return SearchOutcome {
                x,
                fun: fx,
                iterations: iteration,
                evaluations,
                success: true,
                message: "relative reduction of objective below ftol".to_string(),
            };
        }
    }

    SearchOutcome {
        x,
        fun: fx,
        iterations: cfg.max_iterations,
        evaluations,
        success: false,
        message: "iteration limit reached".to_string(),
    }
}

/// 有限差分梯度（坐标截断在 [0, 1]）
fn gradient<F>(f: &F, x: &[f64], h: f64) -> Vec<f64>
where
    F: Fn(&[f64]) -> f64,
{
    let mut probe = x.to_vec();
    (0..x.len())
        .map(|i| {
            let hi = (x[i] + h).min(1.0);
            let lo = (x[i] - h).max(0.0);
            probe[i] = hi;
            let f_hi = f(&probe);
            probe[i] = lo;
            let f_lo = f(&probe);
            probe[i] = x[i];
            if hi > lo {
                (f_hi - f_lo) / (hi - lo)
            } else {
                0.0
            }
        })
        .collect()
}
