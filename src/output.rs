// output formatting - feedback as a table or raw json lines

use crate::{FeedbackRecord, Rating, Registry};

const MAX_WIDTH: usize = 48;

pub struct Output;

impl Output {
    // table for humans
    pub fn pretty(records: &[FeedbackRecord]) {
        if records.is_empty() {
            println!("no feedback yet");
            return;
        }

        let up = records.iter().filter(|r| r.rating == Rating::Positive).count();
        println!(
            "records: {}  ({} positive, {} negative)\n",
            records.len(),
            up,
            records.len() - up
        );

        for line in table(records) {
            println!("{line}");
        }
    }

    // one json object per line, same shape as the log itself
    pub fn raw(records: &[FeedbackRecord]) {
        for record in records {
            println!("{}", serde_json::to_string(record).unwrap_or_default());
        }
    }

    pub fn resolvers(registry: &Registry) {
        for name in registry.names() {
            let model = registry.get(&name).map(|r| r.model()).unwrap_or("-");
            println!("{name}\t{model}");
        }
    }
}

fn table(records: &[FeedbackRecord]) -> Vec<String> {
    let headers = ["rating", "question", "response"];
    let rows: Vec<[String; 3]> = records
        .iter()
        .map(|r| {
            [
                r.rating.to_string(),
                single_line(&r.question),
                single_line(&r.response),
            ]
        })
        .collect();

    // column widths, capped so long answers don't blow up the terminal
    let mut widths = headers.map(|h| h.chars().count());
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count()).min(MAX_WIDTH);
        }
    }

    let format_row = |cells: [&str; 3]| -> String {
        cells
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{:width$}", truncate(c, widths[i]), width = widths[i]))
            .collect::<Vec<_>>()
            .join(" | ")
    };

    let mut lines = vec![format_row(headers)];
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    for row in &rows {
        lines.push(format_row([&row[0], &row[1], &row[2]]));
    }
    lines
}

fn single_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}
