use super::metrics::{line_height_mm, text_width_mm, wrap_text, MM_PER_PT};

// A4 portrait, millimetres, origin at the top-left corner.
pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;
pub const MARGIN_MM: f32 = 20.0;
pub const TOP_MARGIN_MM: f32 = 20.0;
pub const BOTTOM_MARGIN_MM: f32 = 15.0;
pub const CONTENT_WIDTH_MM: f32 = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;

const CELL_PADDING_MM: f32 = 1.76;
const ASCENT_FACTOR: f32 = 0.8;
const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const BLACK: Rgb = Rgb(0, 0, 0);
pub const WHITE: Rgb = Rgb(255, 255, 255);
pub const BRAND_BLUE: Rgb = Rgb(37, 99, 235);
const GRID_HEAD: Rgb = Rgb(41, 128, 185);
const STRIPE: Rgb = Rgb(245, 245, 245);
const GRID_LINE: Rgb = Rgb(200, 200, 200);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    FillRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Rgb,
    },
    StrokeRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Rgb,
    },
    /// `y` is the baseline.
    Text {
        x: f32,
        y: f32,
        size: f32,
        font: Font,
        color: Rgb,
        content: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedRow {
    pub page: usize,
    pub y: f32,
    pub height: f32,
    pub cells: Vec<String>,
}

/// Where a table ended up after pagination.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedTable {
    pub head: Vec<String>,
    pub rows: Vec<PlacedRow>,
    pub final_page: usize,
    pub final_y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableTheme {
    Striped,
    Grid,
}

#[derive(Debug, Clone)]
pub struct TableSpec {
    pub head: Vec<String>,
    pub body: Vec<Vec<String>>,
    pub column_widths: Vec<f32>,
    pub font_size: f32,
    pub theme: TableTheme,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub pages: Vec<Page>,
    pub tables: Vec<PlacedTable>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    pub page: usize,
    pub y: f32,
}

impl Document {
    pub fn new() -> Self {
        Self {
            pages: vec![Page::default()],
            tables: Vec::new(),
        }
    }

    pub fn add_page(&mut self) -> usize {
        self.pages.push(Page::default());
        self.pages.len() - 1
    }

    fn push(&mut self, page: usize, item: Item) {
        self.pages[page].items.push(item);
    }

    pub fn fill_rect(&mut self, page: usize, x: f32, y: f32, width: f32, height: f32, color: Rgb) {
        self.push(
            page,
            Item::FillRect {
                x,
                y,
                width,
                height,
                color,
            },
        );
    }

    pub fn text(&mut self, page: usize, x: f32, y: f32, size: f32, font: Font, color: Rgb, content: &str) {
        self.push(
            page,
            Item::Text {
                x,
                y,
                size,
                font,
                color,
                content: content.to_string(),
            },
        );
    }

    pub fn page_text(&self, page: usize) -> Vec<&str> {
        self.pages
            .get(page)
            .map(|p| {
                p.items
                    .iter()
                    .filter_map(|item| match item {
                        Item::Text { content, .. } => Some(content.as_str()),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Writes wrapped lines starting at `at`, moving to a fresh page when a
    /// line would cross the bottom margin.
    pub fn flow_text(&mut self, at: Cursor, x: f32, width: f32, size: f32, content: &str) -> Cursor {
        let line_h = line_height_mm(size);
        let mut cursor = at;
        for line in wrap_text(content, width, size) {
            if cursor.y > PAGE_HEIGHT_MM - BOTTOM_MARGIN_MM {
                cursor.page = self.add_page();
                cursor.y = TOP_MARGIN_MM;
            }
            if !line.is_empty() {
                self.text(cursor.page, x, cursor.y, size, Font::Regular, BLACK, &line);
            }
            cursor.y += line_h;
        }
        cursor
    }

    /// Lays out a table from `at`, splitting onto new pages (header repeated)
    /// when a row would cross the bottom margin. Cells that still overrun the
    /// page are cut short with an ellipsis. Returns the cursor just below the
    /// last row.
    pub fn place_table(&mut self, at: Cursor, spec: TableSpec) -> Cursor {
        let line_h = line_height_mm(spec.font_size);
        let mut cursor = at;
        let head_lines = wrap_cells(&spec.head, &spec.column_widths, spec.font_size);
        let head_height = row_height(&head_lines, line_h);
        self.draw_row(cursor, &spec, &head_lines, head_height, RowKind::Head);
        cursor.y += head_height;

        let bottom = PAGE_HEIGHT_MM - BOTTOM_MARGIN_MM;
        let mut rows = Vec::with_capacity(spec.body.len());
        let mut rows_on_page = 0usize;
        for (idx, cells) in spec.body.iter().enumerate() {
            let mut lines = wrap_cells(cells, &spec.column_widths, spec.font_size);
            if rows_on_page > 0 && cursor.y + row_height(&lines, line_h) > bottom {
                cursor.page = self.add_page();
                cursor.y = TOP_MARGIN_MM;
                self.draw_row(cursor, &spec, &head_lines, head_height, RowKind::Head);
                cursor.y += head_height;
                rows_on_page = 0;
            }

            let room = bottom - cursor.y - 2.0 * CELL_PADDING_MM;
            let max_lines = (room / line_h).floor().max(1.0) as usize;
            for (cell, width) in lines.iter_mut().zip(&spec.column_widths) {
                clamp_lines(cell, max_lines, width - 2.0 * CELL_PADDING_MM, spec.font_size);
            }
            let height = row_height(&lines, line_h);

            let kind = if idx % 2 == 1 {
                RowKind::Odd
            } else {
                RowKind::Even
            };
            self.draw_row(cursor, &spec, &lines, height, kind);
            rows.push(PlacedRow {
                page: cursor.page,
                y: cursor.y,
                height,
                cells: cells.clone(),
            });
            cursor.y += height;
            rows_on_page += 1;
        }

        self.tables.push(PlacedTable {
            head: spec.head.clone(),
            rows,
            final_page: cursor.page,
            final_y: cursor.y,
        });
        cursor
    }

    fn draw_row(
        &mut self,
        at: Cursor,
        spec: &TableSpec,
        lines: &[Vec<String>],
        height: f32,
        kind: RowKind,
    ) {
        let total_width: f32 = spec.column_widths.iter().sum();
        let is_head = kind == RowKind::Head;

        match (spec.theme, kind) {
            (TableTheme::Striped, RowKind::Head) => {
                self.fill_rect(at.page, MARGIN_MM, at.y, total_width, height, BRAND_BLUE)
            }
            (TableTheme::Striped, RowKind::Odd) => {
                self.fill_rect(at.page, MARGIN_MM, at.y, total_width, height, STRIPE)
            }
            (TableTheme::Grid, RowKind::Head) => {
                self.fill_rect(at.page, MARGIN_MM, at.y, total_width, height, GRID_HEAD)
            }
            _ => {}
        }

        let (font, color) = if is_head {
            (Font::Bold, WHITE)
        } else {
            (Font::Regular, BLACK)
        };
        let line_h = line_height_mm(spec.font_size);
        let ascent = spec.font_size * MM_PER_PT * ASCENT_FACTOR;

        let mut x = MARGIN_MM;
        for (width, cell) in spec.column_widths.iter().zip(lines) {
            if spec.theme == TableTheme::Grid {
                self.push(
                    at.page,
                    Item::StrokeRect {
                        x,
                        y: at.y,
                        width: *width,
                        height,
                        color: GRID_LINE,
                    },
                );
            }
            for (i, line) in cell.iter().enumerate() {
                if line.is_empty() {
                    continue;
                }
                let baseline = at.y + CELL_PADDING_MM + ascent + line_h * i as f32;
                self.text(at.page, x + CELL_PADDING_MM, baseline, spec.font_size, font, color, line);
            }
            x += width;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowKind {
    Head,
    Even,
    Odd,
}

fn wrap_cells(cells: &[String], widths: &[f32], size: f32) -> Vec<Vec<String>> {
    widths
        .iter()
        .enumerate()
        .map(|(col, width)| {
            let content = cells.get(col).map(String::as_str).unwrap_or("");
            wrap_text(content, width - 2.0 * CELL_PADDING_MM, size)
        })
        .collect()
}

fn clamp_lines(lines: &mut Vec<String>, max_lines: usize, width: f32, size: f32) {
    if lines.len() <= max_lines {
        return;
    }
    lines.truncate(max_lines);
    if let Some(last) = lines.last_mut() {
        while !last.is_empty() && text_width_mm(&format!("{last}{ELLIPSIS}"), size) > width {
            last.pop();
        }
        let kept = last.trim_end().len();
        last.truncate(kept);
        last.push_str(ELLIPSIS);
    }
}

fn row_height(lines: &[Vec<String>], line_h: f32) -> f32 {
    let count = lines.iter().map(Vec::len).max().unwrap_or(1).max(1);
    count as f32 * line_h + 2.0 * CELL_PADDING_MM
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(rows: usize, text: &str) -> TableSpec {
        TableSpec {
            head: vec!["Key".to_string(), "Value".to_string()],
            body: (0..rows)
                .map(|i| vec![format!("row {i}"), text.to_string()])
                .collect(),
            column_widths: vec![85.0, 85.0],
            font_size: 10.0,
            theme: TableTheme::Striped,
        }
    }

    #[test]
    fn short_table_stays_on_one_page() {
        let mut doc = Document::new();
        let end = doc.place_table(Cursor { page: 0, y: 85.0 }, spec(12, "v"));
        assert_eq!(doc.pages.len(), 1);
        assert_eq!(end.page, 0);
        let table = &doc.tables[0];
        assert_eq!(table.rows.len(), 12);
        assert!(table.final_y > 85.0);
        assert_eq!(table.final_y, end.y);
    }

    #[test]
    fn long_table_splits_and_repeats_header() {
        let mut doc = Document::new();
        let end = doc.place_table(Cursor { page: 0, y: 25.0 }, spec(80, "v"));
        assert!(doc.pages.len() > 1);
        assert_eq!(end.page, doc.pages.len() - 1);
        for page in 0..doc.pages.len() {
            assert_eq!(doc.page_text(page).iter().filter(|t| **t == "Key").count(), 1);
        }
        let rows = &doc.tables[0].rows;
        for row in rows {
            assert!(row.y + row.height <= PAGE_HEIGHT_MM - BOTTOM_MARGIN_MM + 1e-3);
        }
        assert!(rows.windows(2).all(|w| w[0].page <= w[1].page));
    }

    #[test]
    fn wrapped_cells_grow_the_row() {
        let mut doc = Document::new();
        let long = "word ".repeat(60);
        doc.place_table(Cursor { page: 0, y: 25.0 }, spec(1, &long));
        let mut single = Document::new();
        single.place_table(Cursor { page: 0, y: 25.0 }, spec(1, "word"));
        assert!(doc.tables[0].rows[0].height > single.tables[0].rows[0].height);
    }

    #[test]
    fn row_taller_than_a_page_is_cut_to_fit() {
        let mut doc = Document::new();
        let huge = "word ".repeat(5000);
        let end = doc.place_table(Cursor { page: 0, y: 85.0 }, spec(2, &huge));
        let rows = &doc.tables[0].rows;
        assert_eq!(rows.len(), 2);
        for row in rows {
            assert!(row.y + row.height <= PAGE_HEIGHT_MM - BOTTOM_MARGIN_MM + 1e-3);
        }
        assert_eq!(rows[0].page, 0);
        assert_eq!(rows[1].page, 1);
        assert_eq!(end.page, 1);
        assert_eq!(rows[0].cells[1], huge);
        assert!(doc.page_text(0).iter().any(|t| t.ends_with("...")));
        assert!(doc.page_text(1).iter().any(|t| t.ends_with("...")));
    }

    #[test]
    fn clamped_line_keeps_within_cell_width() {
        let mut lines = vec![
            "alpha beta".to_string(),
            "gamma delta epsilon".to_string(),
            "zeta".to_string(),
        ];
        clamp_lines(&mut lines, 2, 25.0, 10.0);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "alpha beta");
        assert!(lines[1].ends_with("..."));
        assert!(text_width_mm(&lines[1], 10.0) <= 25.0);
    }

    #[test]
    fn flow_text_continues_on_new_page() {
        let mut doc = Document::new();
        let text = "line\n".repeat(100);
        let end = doc.flow_text(Cursor { page: 0, y: 200.0 }, MARGIN_MM, CONTENT_WIDTH_MM, 10.0, &text);
        assert!(end.page >= 1);
        assert_eq!(doc.page_text(0).len() + doc.page_text(1).len() + doc.page_text(2).len(), 100);
    }
}
