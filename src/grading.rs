use std::collections::BTreeMap;

use crate::model::{StudentResult, SubjectConfig};

/// A subject score below this fails the whole exam regardless of percentage.
pub const PASS_MARK: f64 = 35.0;

/// Max marks assumed for a subject whose config has been removed.
pub const FALLBACK_MAX_MARKS: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradeInfo {
    pub letter: &'static str,
    /// Performance level band: OPL / APL / MPL / BPL.
    pub level: &'static str,
}

/// Letter grade and performance level for a score. Inclusive lower bounds,
/// first match wins, no upper bound (150 is still A+).
///
/// Applied in two contexts that must not be mixed: per-subject against the
/// raw mark (marksheet rows, which assumes a max of 100) and against the
/// computed percentage for the overall grade.
pub fn grade_info(score: f64) -> GradeInfo {
    let (letter, level) = if score >= 85.0 {
        ("A+", "OPL")
    } else if score >= 80.0 {
        ("A", "OPL")
    } else if score >= 70.0 {
        ("B+", "APL")
    } else if score >= 60.0 {
        ("B", "APL")
    } else if score >= 50.0 {
        ("C+", "MPL")
    } else if score >= 35.0 {
        ("C", "MPL")
    } else {
        ("D", "BPL")
    };
    GradeInfo { letter, level }
}

/// 2-decimal rounding used for percentages.
pub fn round_off_2_decimals(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn max_marks_for(subject: &str, subjects: &[SubjectConfig]) -> f64 {
    subjects
        .iter()
        .find(|s| s.name == subject)
        .map(|s| s.max_marks as f64)
        .unwrap_or(FALLBACK_MAX_MARKS)
}

/// Full recompute pass over a marks map. Every aggregate on the result is
/// re-derived from the map and the current subject config; nothing is
/// incremental, so recomputing twice from the same map yields the same
/// output regardless of entry order.
pub fn recompute(result: &mut StudentResult, subjects: &[SubjectConfig]) {
    let mut total = 0.0;
    let mut max_total = 0.0;
    let mut is_pass = true;

    for (subject, mark) in &result.marks {
        total += mark;
        max_total += max_marks_for(subject, subjects);
        if *mark < PASS_MARK {
            is_pass = false;
        }
    }

    let percentage = if max_total > 0.0 {
        round_off_2_decimals(100.0 * total / max_total)
    } else {
        0.0
    };

    result.total_marks = total;
    result.max_total_marks = max_total;
    result.percentage = percentage;
    result.overall_grade = Some(grade_info(percentage).letter.to_string());
    result.is_pass = is_pass;
}

/// First-index descending rank: 1 + position of `my_total` in the sorted
/// totals, 0 when the value is absent (including an exam with no results).
pub fn rank_in(totals: &[f64], my_total: f64) -> u32 {
    let mut sorted = totals.to_vec();
    sorted.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
    sorted
        .iter()
        .position(|t| *t == my_total)
        .map(|i| i as u32 + 1)
        .unwrap_or(0)
}

#[allow(dead_code)]
pub fn marks_map(entries: &[(&str, f64)]) -> BTreeMap<String, f64> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), *v))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StudentResult;

    fn subjects_out_of_100() -> Vec<SubjectConfig> {
        ["BENGALI", "ENGLISH", "ARABIC", "MATHEMATICS"]
            .iter()
            .map(|n| SubjectConfig {
                name: n.to_string(),
                max_marks: 100,
            })
            .collect()
    }

    #[test]
    fn grade_table_boundaries() {
        assert_eq!(grade_info(85.0).letter, "A+");
        assert_eq!(grade_info(84.0).letter, "A");
        assert_eq!(grade_info(80.0).letter, "A");
        assert_eq!(grade_info(79.0).letter, "B+");
        assert_eq!(grade_info(70.0).letter, "B+");
        assert_eq!(grade_info(60.0).letter, "B");
        assert_eq!(grade_info(50.0).letter, "C+");
        assert_eq!(grade_info(35.0).letter, "C");
        assert_eq!(grade_info(34.9).letter, "D");
        // No upper bound is enforced.
        assert_eq!(grade_info(150.0).letter, "A+");
    }

    #[test]
    fn grade_is_monotonic_across_boundaries() {
        let order = ["D", "C", "C+", "B", "B+", "A", "A+"];
        let rank = |letter: &str| order.iter().position(|l| *l == letter).unwrap();
        let mut prev = 0;
        for s in 0..=100 {
            let r = rank(grade_info(s as f64).letter);
            assert!(r >= prev, "grade dropped at score {}", s);
            prev = r;
        }
    }

    #[test]
    fn bands_follow_letters() {
        assert_eq!(grade_info(90.0).level, "OPL");
        assert_eq!(grade_info(65.0).level, "APL");
        assert_eq!(grade_info(40.0).level, "MPL");
        assert_eq!(grade_info(10.0).level, "BPL");
    }

    #[test]
    fn recompute_reference_vector() {
        // MATH 90 + ENGLISH 30 out of 100 each: total 120, 60.00%, overall B,
        // fail because one subject is below 35.
        let mut r = StudentResult::empty("111", "Mid Term");
        r.marks = marks_map(&[("MATHEMATICS", 90.0), ("ENGLISH", 30.0)]);
        recompute(&mut r, &subjects_out_of_100());
        assert_eq!(r.total_marks, 120.0);
        assert_eq!(r.max_total_marks, 200.0);
        assert_eq!(r.percentage, 60.0);
        assert_eq!(r.overall_grade.as_deref(), Some("B"));
        assert!(!r.is_pass);
    }

    #[test]
    fn recompute_is_idempotent() {
        let mut r = StudentResult::empty("111", "Mid Term");
        r.marks = marks_map(&[("BENGALI", 72.0), ("ARABIC", 58.0)]);
        let subjects = subjects_out_of_100();
        recompute(&mut r, &subjects);
        let first = (r.total_marks, r.max_total_marks, r.percentage, r.is_pass);
        recompute(&mut r, &subjects);
        assert_eq!(
            first,
            (r.total_marks, r.max_total_marks, r.percentage, r.is_pass)
        );
    }

    #[test]
    fn removed_subject_falls_back_to_max_100() {
        let mut r = StudentResult::empty("111", "Mid Term");
        r.marks = marks_map(&[("SCIENCE", 40.0)]);
        recompute(&mut r, &subjects_out_of_100());
        assert_eq!(r.max_total_marks, 100.0);
        assert_eq!(r.percentage, 40.0);
        assert!(r.is_pass);
    }

    #[test]
    fn empty_marks_map_yields_zeroes() {
        let mut r = StudentResult::empty("111", "Mid Term");
        recompute(&mut r, &subjects_out_of_100());
        assert_eq!(r.total_marks, 0.0);
        assert_eq!(r.percentage, 0.0);
        // Vacuously passing: no subject is below the pass mark.
        assert!(r.is_pass);
    }

    #[test]
    fn percentage_rounds_to_two_decimals() {
        let mut r = StudentResult::empty("111", "Mid Term");
        r.marks = marks_map(&[("BENGALI", 33.0), ("ARABIC", 67.0), ("MATHEMATICS", 50.0)]);
        recompute(&mut r, &subjects_out_of_100());
        // 150/300 = 50.00
        assert_eq!(r.percentage, 50.0);

        let mut r2 = StudentResult::empty("111", "Mid Term");
        r2.marks = marks_map(&[("BENGALI", 51.0), ("ARABIC", 49.0), ("MATHEMATICS", 66.0)]);
        recompute(&mut r2, &subjects_out_of_100());
        // 166/300 = 55.333... -> 55.33
        assert_eq!(r2.percentage, 55.33);
    }

    #[test]
    fn rank_first_index_semantics() {
        assert_eq!(rank_in(&[90.0, 90.0, 70.0], 90.0), 1);
        assert_eq!(rank_in(&[90.0, 90.0, 70.0], 70.0), 3);
        assert_eq!(rank_in(&[], 90.0), 0);
        assert_eq!(rank_in(&[80.0, 60.0], 75.0), 0);
    }
}
