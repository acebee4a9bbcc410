use super::super::domain::Category;
use super::super::scores::ParticipantScores;
use super::super::stats::EvaluatorStats;
use super::views::{CellValue, ReportPayload, StyleRegion, StyleTag};

/// Fixed strings rendered into the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLabels {
    pub title: String,
    pub name_column: String,
    pub evaluator_count_column: String,
    pub stats_title: String,
    pub stats_name_column: String,
    pub stats_total_column: String,
    pub no_evaluators: String,
}

impl ReportLabels {
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

impl Default for ReportLabels {
    fn default() -> Self {
        Self {
            title: "CISV Training Evaluation".to_string(),
            name_column: "Name".to_string(),
            evaluator_count_column: "Evaluators".to_string(),
            stats_title: "EVALUATIONS BY EVALUATOR".to_string(),
            stats_name_column: "Evaluator".to_string(),
            stats_total_column: "Total evaluations".to_string(),
            no_evaluators: "No evaluators found".to_string(),
        }
    }
}

/// Participants of one category with their aggregated scores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryBlock {
    pub category: Category,
    pub criteria: Vec<String>,
    pub rows: Vec<ParticipantScores>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("no criteria configured for {} participants", .category.label())]
    EmptyCriteria { category: Category },
    #[error("{} participant block appears more than once", .category.label())]
    DuplicateCategory { category: Category },
}

#[derive(Debug, Clone, Copy)]
enum Span {
    Report,
    Columns(usize),
}

struct PendingRegion {
    row_start: usize,
    row_end: usize,
    span: Span,
    style: StyleTag,
    category: Option<Category>,
}

/// Appends rows and remembers which of them get styled. Region widths that
/// depend on the whole report are settled in `finish`.
#[derive(Default)]
struct MatrixWriter {
    matrix: Vec<Vec<CellValue>>,
    pending: Vec<PendingRegion>,
}

impl MatrixWriter {
    fn next_row(&self) -> usize {
        self.matrix.len()
    }

    fn push(&mut self, row: Vec<CellValue>) -> usize {
        self.matrix.push(row);
        self.matrix.len() - 1
    }

    fn spacer(&mut self) {
        self.matrix.push(vec![CellValue::Blank]);
    }

    fn mark(
        &mut self,
        rows: std::ops::Range<usize>,
        span: Span,
        style: StyleTag,
        category: Option<Category>,
    ) {
        if rows.is_empty() {
            return;
        }

        self.pending.push(PendingRegion {
            row_start: rows.start,
            row_end: rows.end,
            span,
            style,
            category,
        });
    }

    fn finish(self) -> ReportPayload {
        let width = self.matrix.iter().map(Vec::len).max().unwrap_or(0);
        let regions = self
            .pending
            .into_iter()
            .map(|region| StyleRegion {
                row_start: region.row_start,
                row_end: region.row_end,
                col_start: 0,
                col_end: match region.span {
                    Span::Report => width,
                    Span::Columns(columns) => columns,
                },
                style: region.style,
                category: region.category,
            })
            .collect();

        ReportPayload {
            matrix: self.matrix,
            regions,
        }
    }
}

/// Lays out the title, one block per participant category and the evaluator
/// statistics block into a single matrix.
#[derive(Debug, Clone, Default)]
pub struct ReportLayoutBuilder {
    labels: ReportLabels,
}

impl ReportLayoutBuilder {
    pub fn new(labels: ReportLabels) -> Self {
        Self { labels }
    }

    pub fn labels(&self) -> &ReportLabels {
        &self.labels
    }

    pub fn build(
        &self,
        blocks: &[CategoryBlock],
        stats: &[EvaluatorStats],
    ) -> Result<ReportPayload, LayoutError> {
        let blocks = Self::ordered_blocks(blocks)?;
        let mut writer = MatrixWriter::default();

        let title = writer.push(vec![CellValue::text(&self.labels.title)]);
        writer.mark(title..title + 1, Span::Report, StyleTag::Title, None);
        writer.spacer();

        for (position, block) in blocks.iter().enumerate() {
            if position > 0 {
                writer.spacer();
            }
            self.write_category(&mut writer, block);
        }

        writer.spacer();
        writer.spacer();
        self.write_stats(&mut writer, stats);

        Ok(writer.finish())
    }

    fn ordered_blocks(blocks: &[CategoryBlock]) -> Result<Vec<&CategoryBlock>, LayoutError> {
        let mut ordered = Vec::with_capacity(blocks.len());
        for category in Category::ordered() {
            let mut matching = blocks.iter().filter(|block| block.category == category);
            if let Some(block) = matching.next() {
                if matching.next().is_some() {
                    return Err(LayoutError::DuplicateCategory { category });
                }
                if block.criteria.is_empty() {
                    return Err(LayoutError::EmptyCriteria { category });
                }
                ordered.push(block);
            }
        }
        Ok(ordered)
    }

    fn write_category(&self, writer: &mut MatrixWriter, block: &CategoryBlock) {
        let category = Some(block.category);

        let header = writer.push(vec![CellValue::text(block.category.section_label())]);
        writer.mark(
            header..header + 1,
            Span::Report,
            StyleTag::CategoryHeader,
            category,
        );

        let mut columns = Vec::with_capacity(block.criteria.len() + 2);
        columns.push(CellValue::text(&self.labels.name_column));
        columns.extend(block.criteria.iter().map(CellValue::text));
        columns.push(CellValue::text(&self.labels.evaluator_count_column));
        let width = columns.len();
        let column_header = writer.push(columns);
        writer.mark(
            column_header..column_header + 1,
            Span::Columns(width),
            StyleTag::ColumnHeader,
            category,
        );

        let mut rows: Vec<&ParticipantScores> = block.rows.iter().collect();
        rows.sort_by(|left, right| {
            left.name
                .cmp(&right.name)
                .then_with(|| left.participant_id.cmp(&right.participant_id))
        });

        for scores in rows {
            let mut row = Vec::with_capacity(width);
            row.push(CellValue::text(&scores.name));
            for criterion in &block.criteria {
                let average = scores
                    .averages
                    .iter()
                    .find(|average| &average.criterion == criterion)
                    .and_then(|average| average.average.clone());
                row.push(CellValue::from(average));
            }
            row.push(CellValue::Number(scores.unique_evaluator_count as u64));
            writer.push(row);
        }
    }

    fn write_stats(&self, writer: &mut MatrixWriter, stats: &[EvaluatorStats]) {
        let categories = Category::ordered();
        let width = 2 + categories.len();

        let title = writer.push(vec![CellValue::text(&self.labels.stats_title)]);
        writer.mark(
            title..title + 1,
            Span::Columns(width),
            StyleTag::StatsHeader,
            None,
        );

        let mut columns = vec![
            CellValue::text(&self.labels.stats_name_column),
            CellValue::text(&self.labels.stats_total_column),
        ];
        columns.extend(
            categories
                .iter()
                .map(|category| CellValue::text(format!("{} evaluations", category.label()))),
        );
        let column_header = writer.push(columns);
        writer.mark(
            column_header..column_header + 1,
            Span::Columns(width),
            StyleTag::ColumnHeader,
            None,
        );

        if stats.is_empty() {
            writer.push(vec![CellValue::text(&self.labels.no_evaluators)]);
            return;
        }

        let body_start = writer.next_row();
        for entry in stats {
            let mut row = Vec::with_capacity(width);
            row.push(CellValue::text(&entry.name));
            row.push(CellValue::Number(entry.total));
            row.extend(
                categories
                    .iter()
                    .map(|category| CellValue::Number(entry.count(*category))),
            );
            writer.push(row);
        }
        writer.mark(
            body_start..writer.next_row(),
            Span::Columns(width),
            StyleTag::StatsBody,
            None,
        );
    }
}
