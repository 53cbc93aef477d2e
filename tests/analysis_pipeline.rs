use approx::assert_relative_eq;

use row_correlation::ingestion::parse_table;
use row_correlation::output::HEADER_LABELS;
use row_correlation::pipeline::{analyze_bytes, analyze_table, AnalysisOptions};
use row_correlation::processing::{find_filter_row, prune_columns};
use row_correlation::types::{RowStats, LABEL_COLUMNS};

const CATEGORY_INPUT: &str =
    "id\tname\tcat\tx\ty\nrow\tA\tk\t1\t2\nrow\tB\tk\t2\t4\nrow\tC\tk\t3\t6\n";

fn probes() -> String {
    std::fs::read_to_string("tests/fixtures/probes.tsv").unwrap()
}

#[test]
fn linear_rows_have_unit_pearson_against_first_match() {
    let mut table = parse_table(CATEGORY_INPUT);
    let summary = analyze_table(&mut table, &AnalysisOptions::with_filter(2, "k"));

    assert_eq!(summary.filter_row, Some(1));
    assert_eq!(table.rows[1].field_text(1), Some("A"));
    for row in table.data_rows() {
        assert_relative_eq!(row.full.pearson, 1.0);
        assert_relative_eq!(row.full.spearman, 1.0);
    }
}

#[test]
fn category_table_renders_exactly() {
    let output = analyze_bytes(CATEGORY_INPUT.as_bytes(), &AnalysisOptions::with_filter(2, "k")).unwrap();

    // `cat` parses as 0 in the filter row, so it is pruned everywhere.
    let expected = [
        format!("id\tname\tx\ty\t{}", HEADER_LABELS.join("\t")),
        "row\tA\t1\t2\t3\t3.000000\t5.000000\t1.000000\t1.000000\t1.000000\t1.000000\t2\t3.000000\t5.000000\t1.500000\t1.500000\t1.000000\t1.000000".to_string(),
        "row\tB\t2\t4\t3\t6.000000\t20.000000\t2.000000\t2.000000\t1.000000\t1.000000\t2\t6.000000\t20.000000\t3.000000\t3.000000\t1.000000\t1.000000".to_string(),
        "row\tC\t3\t6\t3\t9.000000\t45.000000\t3.000000\t3.000000\t1.000000\t1.000000\t2\t9.000000\t45.000000\t4.500000\t4.500000\t1.000000\t1.000000".to_string(),
    ];
    assert_eq!(output.text, format!("{}\n", expected.join("\n")));
}

#[test]
fn disqualified_columns_vanish_from_minimized_output() {
    let input = probes();
    let output = analyze_bytes(input.as_bytes(), &AnalysisOptions::with_filter(1, "ref")).unwrap();

    assert_eq!(output.summary.removed_columns, vec![3, 5]);
    assert_eq!(output.summary.retained_columns, 3);

    let header = output.text.lines().next().unwrap();
    assert!(header.starts_with("probe\tlabel\ts1\ts3\ts5\ttotal_count"));
    assert!(!header.contains("s2"));
    assert!(!header.contains("s4"));

    let alpha: Vec<&str> = output.text.lines().nth(2).unwrap().split('\t').collect();
    assert_eq!(&alpha[..5], &["p2", "alpha", "3", "1", "9"]);
    assert_eq!(alpha.len(), 5 + HEADER_LABELS.len());
}

#[test]
fn minimized_sums_lose_exactly_the_pruned_values() {
    let input = probes();
    let original = parse_table(&input);
    let mut table = original.clone();
    analyze_table(&mut table, &AnalysisOptions::with_filter(1, "ref"));

    for (before, after) in original.data_rows().zip(table.data_rows()) {
        let removed: f64 = [3, 5]
            .iter()
            .filter_map(|&p| before.fields.get(p))
            .map(|c| c.value)
            .sum();
        assert_relative_eq!(after.min.sum_x, after.full.sum_x - removed);
        assert!(after.min.valid_column_count <= after.full.valid_column_count);
    }
}

#[test]
fn both_passes_correlate_as_expected() {
    let input = probes();
    let mut table = parse_table(&input);
    let summary = analyze_table(&mut table, &AnalysisOptions::with_filter(1, "ref"));

    // Only rows with the same placeholder count as the filter row take part in the full pass.
    assert_eq!(summary.full_pass.correlated, 2);
    assert_eq!(summary.full_pass.skipped, 2);
    assert_eq!(summary.minimized_pass.correlated, 4);

    let beta = &table.rows[3];
    assert_relative_eq!(beta.full.pearson, 1.0, epsilon = 1e-12);
    assert_relative_eq!(beta.min.pearson, 1.0, epsilon = 1e-12);
    assert_relative_eq!(beta.min.spearman, 1.0);

    let alpha = &table.rows[2];
    assert_eq!(alpha.full, RowStats { pearson: 0.0, spearman: 0.0, sum_xy: 0.0, ..alpha.full });
    assert_relative_eq!(alpha.min.spearman, 1.0);
    assert_eq!(alpha.min.sum_x, 13.0);

    let gamma = &table.rows[4];
    assert_relative_eq!(gamma.min.spearman, 0.5);
    assert_eq!(gamma.min.sum_x, 9.0);
}

#[test]
fn filter_row_statistics_are_self_consistent_after_pruning() {
    let input = probes();
    let mut table = parse_table(&input);
    analyze_table(&mut table, &AnalysisOptions::with_filter(1, "ref"));

    let filter = &table.rows[1];
    assert_eq!(filter.min.column_count, 3);
    assert_eq!(filter.min.valid_column_count, 3);
    assert_eq!(filter.min.sum_x, 14.0);
    assert_eq!(filter.min.sum_xx, 84.0);
    assert_relative_eq!(filter.min.pearson, 1.0);
    assert_eq!(filter.min.spearman, 1.0);
}

#[test]
fn retained_columns_never_include_labels() {
    for (input, column, value) in [
        (CATEGORY_INPUT.to_string(), 2, "k"),
        (probes(), 1, "ref"),
        (probes(), 1, "gamma"),
    ] {
        let mut table = parse_table(&input);
        analyze_table(&mut table, &AnalysisOptions::with_filter(column, value));
        assert!(table.retained_column_count <= table.total_columns - LABEL_COLUMNS);
    }
}

#[test]
fn pruning_again_keeps_minimized_statistics() {
    let input = probes();
    let mut table = parse_table(&input);
    let filter = find_filter_row(&table, 1, Some("ref")).unwrap();
    prune_columns(&mut table, filter).unwrap();
    let once: Vec<RowStats> = table.rows.iter().map(|r| r.min).collect();

    prune_columns(&mut table, filter).unwrap();
    let twice: Vec<RowStats> = table.rows.iter().map(|r| r.min).collect();
    assert_eq!(once, twice);
}

#[test]
fn average_over_all_columns_times_count_gives_sum() {
    let input = probes();
    let mut table = parse_table(&input);
    analyze_table(&mut table, &AnalysisOptions::with_filter(1, "ref"));

    for row in table.data_rows() {
        for stats in [row.full, row.min] {
            if stats.column_count > 0 {
                assert_relative_eq!(stats.avg_all() * stats.column_count as f64, stats.sum_x);
            }
        }
    }
}

#[test]
fn printed_average_times_printed_count_gives_printed_sum() {
    let input = "id name a b c d\nr A 1 0 2 3\nr B 0 2 0 6\nr C 4 5 6 7\n";
    let output = analyze_bytes(input.as_bytes(), &AnalysisOptions::with_filter(1, "A")).unwrap();

    for line in output.text.lines().skip(1) {
        let fields: Vec<&str> = line.split('\t').collect();
        let stats = &fields[fields.len() - HEADER_LABELS.len()..];
        for block in [&stats[..7], &stats[7..]] {
            let count: f64 = block[0].parse().unwrap();
            let sum: f64 = block[1].parse().unwrap();
            let avg_all: f64 = block[3].parse().unwrap();
            if count > 0.0 {
                assert_relative_eq!(avg_all * count, sum, epsilon = 1e-5);
            }
        }
    }
}

#[test]
fn placeholders_in_different_positions_keep_spearman_in_range() {
    let input = "id name a b c d\nr A 0 0 1 2\nr B 3 4 0 0\n";
    let mut table = parse_table(input);
    let summary = analyze_table(&mut table, &AnalysisOptions::with_filter(1, "A"));

    assert_eq!(summary.full_pass.correlated, 2);
    let b = &table.rows[2];
    assert_eq!(b.full.valid_column_count, 2);
    assert!((-1.0..=1.0).contains(&b.full.spearman), "{:?}", b.full);
    assert_relative_eq!(b.full.spearman, 1.0);
}

#[test]
fn interior_blank_lines_survive_into_the_output() {
    let input = "id name a\nr A 1\n\nr B 2\n";
    for options in [AnalysisOptions::default(), AnalysisOptions::with_filter(1, "A")] {
        let output = analyze_bytes(input.as_bytes(), &options).unwrap();
        assert_eq!(output.text.lines().count(), input.lines().count());
        assert!(output.text.lines().nth(3).unwrap().starts_with("r\tB\t2\t"));
    }
}

#[test]
fn absent_filter_value_keeps_shape_and_zeroes_statistics() {
    let input = probes();
    let output = analyze_bytes(input.as_bytes(), &AnalysisOptions::default()).unwrap();

    assert_eq!(output.summary.filter_row, None);
    assert_eq!(output.text.lines().count(), input.lines().count());

    for (line, source) in output.text.lines().zip(input.lines()).skip(1) {
        let fields: Vec<&str> = line.split('\t').collect();
        let source_fields = source.split('\t').count();
        assert_eq!(&fields[..source_fields], source.split('\t').collect::<Vec<_>>().as_slice());
        for stat in &fields[source_fields..] {
            assert_eq!(stat.parse::<f64>().unwrap(), 0.0, "line {line:?}");
        }
    }
}

#[test]
fn unmatched_filter_value_behaves_like_no_filter() {
    let input = probes();
    let unmatched = analyze_bytes(input.as_bytes(), &AnalysisOptions::with_filter(1, "nope")).unwrap();
    let absent = analyze_bytes(input.as_bytes(), &AnalysisOptions::default()).unwrap();
    assert_eq!(unmatched.text, absent.text);
}

#[test]
fn crlf_input_and_ragged_rows_are_tolerated() {
    let input = "id name a b c\r\nr F 1 2 3\r\nr G 2 4\r\nr H 3 6 9 12\r\n";
    let output = analyze_bytes(input.as_bytes(), &AnalysisOptions::with_filter(1, "F")).unwrap();

    assert_eq!(output.text.lines().count(), 4);
    assert!(!output.text.contains('\r'));
    // Short and long rows are skipped by both passes rather than failing the run.
    assert_eq!(output.summary.full_pass.correlated, 1);
    assert_eq!(output.summary.full_pass.skipped, 2);
}
