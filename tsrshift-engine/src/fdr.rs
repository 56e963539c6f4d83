//! Benjamini-Hochberg false discovery rate control.

///
/// Adjust p-values with the Benjamini-Hochberg step-up procedure.
///
/// Returns one q-value per input p-value, in input order. Every q-value is
/// at least its p-value, at most 1, and q-values are monotone in the rank of
/// their p-values.
///
pub fn benjamini_hochberg(p_values: &[f64]) -> Vec<f64> {
    let m = p_values.len();
    if m == 0 {
        return Vec::new();
    }

    let mut order: Vec<usize> = (0..m).collect();
    order.sort_by(|&a, &b| p_values[a].total_cmp(&p_values[b]).then(a.cmp(&b)));

    let mut q_values = vec![0.0; m];
    let mut running_min: f64 = 1.0;
    for (rank0, &idx) in order.iter().enumerate().rev() {
        let rank = (rank0 + 1) as f64;
        let q = p_values[idx] * m as f64 / rank;
        running_min = running_min.min(q);
        q_values[idx] = running_min;
    }

    q_values
}
