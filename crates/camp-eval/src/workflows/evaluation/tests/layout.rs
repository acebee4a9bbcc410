use super::common::*;
use crate::workflows::evaluation::domain::{Category, RecordId};
use crate::workflows::evaluation::layout::{
    CategoryBlock, CellValue, LayoutError, ReportLabels, ReportLayoutBuilder, StyleRegion,
    StyleTag,
};
use crate::workflows::evaluation::scores::{CriterionAverage, ParticipantScores};
use crate::workflows::evaluation::stats::EvaluatorStats;

fn text_row(cells: &[&str]) -> Vec<CellValue> {
    cells.iter().map(|cell| CellValue::text(*cell)).collect()
}

fn region(
    rows: std::ops::Range<usize>,
    col_end: usize,
    style: StyleTag,
    category: Option<Category>,
) -> StyleRegion {
    StyleRegion {
        row_start: rows.start,
        row_end: rows.end,
        col_start: 0,
        col_end,
        style,
        category,
    }
}

fn scores(id: &str, name: &str, averages: &[(&str, Option<&str>)], count: usize) -> ParticipantScores {
    ParticipantScores {
        participant_id: RecordId::new(id),
        name: name.to_string(),
        averages: averages
            .iter()
            .map(|(criterion, average)| CriterionAverage {
                criterion: criterion.to_string(),
                average: average.map(str::to_string),
                rated_by: usize::from(average.is_some()),
            })
            .collect(),
        unique_evaluator_count: count,
    }
}

#[test]
fn camp_scenario_renders_expected_matrix() {
    let (generator, _, _) = generator(MemoryRepository::default());
    let compiled = generator.compile(&camp_records()).expect("layout builds");
    let payload = &compiled.payload;

    let title = ReportLabels::default().title;
    assert_eq!(payload.row_count(), 16);
    assert_eq!(payload.width(), 5);
    assert_eq!(payload.matrix[0], text_row(&[title.as_str()]));
    assert_eq!(payload.matrix[1], vec![CellValue::Blank]);
    assert_eq!(payload.matrix[2], text_row(&["LEADERS"]));
    assert_eq!(
        payload.matrix[3],
        text_row(&["Name", "Energy", "Discipline", "Evaluators"])
    );
    assert_eq!(
        payload.matrix[4],
        vec![
            CellValue::text("Alice"),
            CellValue::text("4.0"),
            CellValue::Blank,
            CellValue::Number(2),
        ]
    );
    assert_eq!(payload.matrix[5], vec![CellValue::Blank]);
    assert_eq!(payload.matrix[6], text_row(&["SUPPORTERS"]));
    assert_eq!(
        payload.matrix[7],
        text_row(&["Name", "Energy", "Teamwork", "Focus", "Evaluators"])
    );
    assert_eq!(
        payload.matrix[8],
        vec![
            CellValue::text("Bob"),
            CellValue::Blank,
            CellValue::Blank,
            CellValue::Blank,
            CellValue::Number(0),
        ]
    );
    assert!(payload.matrix[9..11]
        .iter()
        .all(|row| row.iter().all(CellValue::is_blank)));
    assert_eq!(payload.matrix[11], text_row(&["EVALUATIONS BY EVALUATOR"]));
    assert_eq!(
        payload.matrix[12],
        text_row(&[
            "Evaluator",
            "Total evaluations",
            "Leader evaluations",
            "Supporter evaluations",
        ])
    );

    let stats_rows: Vec<Vec<String>> = payload.matrix[13..]
        .iter()
        .map(|row| row.iter().map(ToString::to_string).collect())
        .collect();
    assert_eq!(
        stats_rows,
        [
            ["Evaluator X", "1", "1", "0"],
            ["Evaluator Y", "1", "1", "0"],
            ["Evaluator Z", "0", "0", "0"],
        ]
    );
}

#[test]
fn camp_scenario_styles_every_block() {
    let (generator, _, _) = generator(MemoryRepository::default());
    let payload = generator.compile(&camp_records()).expect("layout builds").payload;

    assert_eq!(
        payload.regions,
        vec![
            region(0..1, 5, StyleTag::Title, None),
            region(2..3, 5, StyleTag::CategoryHeader, Some(Category::Leader)),
            region(3..4, 4, StyleTag::ColumnHeader, Some(Category::Leader)),
            region(6..7, 5, StyleTag::CategoryHeader, Some(Category::Supporter)),
            region(7..8, 5, StyleTag::ColumnHeader, Some(Category::Supporter)),
            region(11..12, 4, StyleTag::StatsHeader, None),
            region(12..13, 4, StyleTag::ColumnHeader, None),
            region(13..16, 4, StyleTag::StatsBody, None),
        ]
    );
    assert!(payload
        .regions
        .iter()
        .all(|region| region.row_end <= payload.row_count() && region.col_end <= payload.width()));
}

#[test]
fn blocks_render_in_category_order_with_rows_sorted_by_name() {
    let builder = ReportLayoutBuilder::new(ReportLabels::with_title("Camp"));
    let blocks = [
        CategoryBlock {
            category: Category::Supporter,
            criteria: vec!["Teamwork".to_string()],
            rows: vec![scores("s1", "Vy", &[("Teamwork", Some("3.5"))], 2)],
        },
        CategoryBlock {
            category: Category::Leader,
            criteria: vec!["Energy".to_string()],
            rows: vec![
                scores("l2", "Minh", &[("Energy", None)], 0),
                scores("l1", "An", &[("Energy", Some("4.0"))], 1),
                scores("l0", "Minh", &[("Energy", Some("2.0"))], 1),
            ],
        },
    ];

    let payload = builder.build(&blocks, &[]).expect("layout builds");

    let names: Vec<String> = payload
        .matrix
        .iter()
        .map(|row| row[0].to_string())
        .collect();
    assert_eq!(&names[..3], ["Camp", "", "LEADERS"]);
    assert_eq!(&names[4..7], ["An", "Minh", "Minh"]);
    assert_eq!(payload.matrix[5][1], CellValue::text("2.0"));
    assert!(payload.matrix[6][1].is_blank());
    assert_eq!(names[8], "SUPPORTERS");
    assert_eq!(names[10], "Vy");
}

#[test]
fn empty_roster_renders_notice_row() {
    let builder = ReportLayoutBuilder::default();
    let blocks = [CategoryBlock {
        category: Category::Leader,
        criteria: vec!["Energy".to_string()],
        rows: Vec::new(),
    }];

    let payload = builder.build(&blocks, &[]).expect("layout builds");

    let last = payload.matrix.last().expect("rows present");
    assert_eq!(last, &text_row(&["No evaluators found"]));
    assert_eq!(payload.regions_tagged(StyleTag::StatsBody).count(), 0);
    assert_eq!(payload.regions_tagged(StyleTag::StatsHeader).count(), 1);
}

#[test]
fn stats_columns_follow_category_order() {
    let builder = ReportLayoutBuilder::default();
    let blocks = [CategoryBlock {
        category: Category::Leader,
        criteria: vec!["Energy".to_string()],
        rows: Vec::new(),
    }];
    let stats = [EvaluatorStats {
        evaluator_id: RecordId::new("e1"),
        name: "Evaluator X".to_string(),
        total: 5,
        per_category: [(Category::Supporter, 2), (Category::Leader, 3)]
            .into_iter()
            .collect(),
    }];

    let payload = builder.build(&blocks, &stats).expect("layout builds");

    assert_eq!(
        payload.matrix.last(),
        Some(&vec![
            CellValue::text("Evaluator X"),
            CellValue::Number(5),
            CellValue::Number(3),
            CellValue::Number(2),
        ])
    );
}

#[test]
fn empty_criteria_list_is_rejected() {
    let builder = ReportLayoutBuilder::default();
    let blocks = [CategoryBlock {
        category: Category::Supporter,
        criteria: Vec::new(),
        rows: Vec::new(),
    }];

    assert_eq!(
        builder.build(&blocks, &[]),
        Err(LayoutError::EmptyCriteria {
            category: Category::Supporter
        })
    );
}

#[test]
fn duplicate_category_block_is_rejected() {
    let builder = ReportLayoutBuilder::default();
    let block = CategoryBlock {
        category: Category::Leader,
        criteria: vec!["Energy".to_string()],
        rows: Vec::new(),
    };

    assert_eq!(
        builder.build(&[block.clone(), block], &[]),
        Err(LayoutError::DuplicateCategory {
            category: Category::Leader
        })
    );
}

#[test]
fn layout_is_deterministic() {
    let (generator, _, _) = generator(MemoryRepository::default());
    let records = camp_records();

    let first = generator.compile(&records).expect("layout builds");
    let second = generator.compile(&records).expect("layout builds");
    assert_eq!(first.payload, second.payload);
}
