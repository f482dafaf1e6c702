// ==========================================
// 差分进化 (best/1/bin)
// ==========================================
// 种群在 [0, 1]^n 上拉丁超立方初始化
// 每代抖动变异因子 F ∈ [min, max), 延迟更新
// 随机数全部在主线程顺序生成; 只有目标函数评估可并行
// ==========================================

use super::local_search;
use super::outcome::SearchOutcome;
use crate::config::{DifferentialEvolutionConfig, LocalSearchConfig};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

/// 最小种群
const MIN_POPULATION: usize = 5;

/// 差分进化搜索
///
/// # 参数
/// - `f`: 归一化坐标上的目标函数（需可跨线程共享）
/// - `dim`: 自由维度数
/// - `cfg`: 差分进化参数
/// - `polish_cfg`: 打磨阶段的局部下降参数
/// - `parallel`: 是否并行评估种群
pub(crate) fn minimize<F>(
    f: &F,
    dim: usize,
    cfg: &DifferentialEvolutionConfig,
    polish_cfg: &LocalSearchConfig,
    parallel: bool,
) -> SearchOutcome
where
    F: Fn(&[f64]) -> f64 + Sync,
{
    if dim == 0 {
        return local_search::minimize(f, &[], polish_cfg);
    }

    let mut rng = ChaCha8Rng::seed_from_u64(cfg.seed);
    let np = (cfg.popsize * dim).max(MIN_POPULATION);

    let mut population = latin_hypercube(np, dim, &mut rng);
    let mut energies = evaluate(f, &population, parallel);
    let mut evaluations = np as u64;
    let mut best = argmin(&energies);

    let mut converged = false;
    let mut generations = 0u64;
    for generation in 1..=cfg.max_generations {
        generations = generation;
        let scale = if cfg.mutation_max > cfg.mutation_min {
            rng.random_range(cfg.mutation_min..cfg.mutation_max)
        } else {
            cfg.mutation_min
        };

        let trials: Vec<Vec<f64>> = (0..np)
            .map(|i| {
                let (r0, r1) = pick_two(np, i, &mut rng);
                let forced = rng.random_range(0..dim);
                (0..dim)
                    .map(|j| {
                        let cross = j == forced || rng.random::<f64>() < cfg.recombination;
                        if !cross {
                            return population[i][j];
                        }
                        let v = population[best][j]
                            + scale * (population[r0][j] - population[r1][j]);
                        if (0.0..=1.0).contains(&v) {
                            v
                        } else {
                            // 越界分量重新随机
                            rng.random::<f64>()
                        }
                    })
                    .collect()
            })
            .collect();

        let trial_energies = evaluate(f, &trials, parallel);
        evaluations += np as u64;

        for (i, (trial, energy)) in trials.into_iter().zip(trial_energies).enumerate() {
            if energy <= energies[i] {
                population[i] = trial;
                energies[i] = energy;
            }
        }
        best = argmin(&energies);

        if is_converged(&energies, cfg) {
            converged = true;
            break;
        }
    }

    tracing::debug!(
        generations,
        population = np,
        best = energies[best],
        converged,
        "差分进化结束"
    );

    let mut outcome = SearchOutcome {
        x: population[best].clone(),
        fun: energies[best],
        iterations: generations,
        evaluations,
        success: converged,
        message: if converged {
            "population energy spread below tolerance".to_string()
        } else {
            "maximum number of generations reached".to_string()
        },
    };

    if cfg.polish {
        let polished = local_search::minimize(f, &outcome.x, polish_cfg);
        outcome.evaluations += polished.evaluations;
        if polished.fun < outcome.fun {
            tracing::debug!(before = outcome.fun, after = polished.fun, "打磨改进最优个体");
            outcome.x = polished.x;
            outcome.fun = polished.fun;
        }
    }

    outcome
}

/// 拉丁超立方采样: 每维 np 个等宽分层各取一点, 分层顺序随机
fn latin_hypercube(np: usize, dim: usize, rng: &mut ChaCha8Rng) -> Vec<Vec<f64>> {
    let mut population = vec![vec![0.0; dim]; np];
    let width = 1.0 / np as f64;
    for j in 0..dim {
        let mut strata: Vec<usize> = (0..np).collect();
        strata.shuffle(rng);
        for (i, stratum) in strata.into_iter().enumerate() {
            population[i][j] = (stratum as f64 + rng.random::<f64>()) * width;
        }
    }
    population
}

/// 从种群中取两个互不相同且不等于 exclude 的下标
fn pick_two(np: usize, exclude: usize, rng: &mut ChaCha8Rng) -> (usize, usize) {
    let mut r0 = rng.random_range(0..np);
    while r0 == exclude {
        r0 = rng.random_range(0..np);
    }
    let mut r1 = rng.random_range(0..np);
    while r1 == exclude || r1 == r0 {
        r1 = rng.random_range(0..np);
    }
    (r0, r1)
}

/// 评估候选; 并行时保持输出顺序
fn evaluate<F>(f: &F, candidates: &[Vec<f64>], parallel: bool) -> Vec<f64>
where
    F: Fn(&[f64]) -> f64 + Sync,
{
    if parallel {
        candidates.par_iter().map(|c| f(c.as_slice())).collect()
    } else {
        candidates.iter().map(|c| f(c.as_slice())).collect()
    }
}

fn argmin(values: &[f64]) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0, f64::INFINITY), |(bi, bv), (i, &v)| {
            if v < bv {
                (i, v)
            } else {
                (bi, bv)
            }
        })
        .0
}

/// std(能量) ≤ atol + tol × |mean(能量)|
fn is_converged(energies: &[f64], cfg: &DifferentialEvolutionConfig) -> bool {
    if energies.iter().any(|e| !e.is_finite()) {
        return false;
    }
    let n = energies.len() as f64;
    let mean = energies.iter().sum::<f64>() / n;
    let var = energies.iter().map(|e| (e - mean).powi(2)).sum::<f64>() / n;
    var.sqrt() <= cfg.atol + cfg.tol * mean.abs()
}
