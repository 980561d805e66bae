use super::model::Scent;

/// Expected header cells, in record-field order. The sheet occasionally
/// ships a legacy variant without the three price columns; those fields
/// then default to empty strings rather than failing the parse.
pub const EXPECTED_HEADERS: [&str; 14] = [
    "ID",
    "Name",
    "Family",
    "Short Description",
    "Top Notes",
    "Heart Notes",
    "Base Notes",
    "Key Ingredients",
    "Origin Country",
    "Status",
    "Notes",
    "Price 500ml",
    "Price 150ml",
    "Price 60ml",
];

/// Parse raw CSV text into rows of fields.
///
/// Character-level state machine rather than a split on commas: fields may
/// contain literal commas and newlines inside quotes, and a doubled quote
/// inside a quoted field is a literal quote character. Line endings are
/// normalized up front so `\r\n` and bare `\r` both terminate rows. Rows
/// that are blank in every field are discarded.
pub fn parse_rows(text: &str) -> Vec<Vec<String>> {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");

    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = normalized.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
        } else {
            match c {
                '"' => in_quotes = true,
                ',' => row.push(std::mem::take(&mut field)),
                '\n' => {
                    row.push(std::mem::take(&mut field));
                    rows.push(std::mem::take(&mut row));
                }
                _ => field.push(c),
            }
        }
    }

    // Flush the trailing field and row even without a final newline.
    row.push(field);
    rows.push(row);

    rows.retain(|r| !r.is_empty() && r.iter().any(|v| !v.trim().is_empty()));
    rows
}

/// Map each expected header to its column index in the actual header row.
/// Matching is case-insensitive and independent of column order; an absent
/// header resolves to `None`.
fn resolve_header(header: &[String]) -> [Option<usize>; EXPECTED_HEADERS.len()] {
    let cells: Vec<String> = header.iter().map(|h| h.trim().to_lowercase()).collect();
    let mut map = [None; EXPECTED_HEADERS.len()];
    for (i, name) in EXPECTED_HEADERS.iter().enumerate() {
        let want = name.to_lowercase();
        map[i] = cells.iter().position(|c| *c == want);
    }
    map
}

/// Turn parsed rows into records. The first retained row is the header;
/// every cell missing from a data row (short row or unresolved column)
/// becomes an empty string.
pub fn rows_to_scents(rows: &[Vec<String>]) -> Vec<Scent> {
    let Some((header, data)) = rows.split_first() else {
        return Vec::new();
    };
    let idx = resolve_header(header);

    data.iter()
        .map(|row| {
            let cell = |i: usize| -> String {
                idx[i]
                    .and_then(|col| row.get(col))
                    .cloned()
                    .unwrap_or_default()
            };
            Scent {
                id: cell(0),
                name: cell(1),
                family: cell(2),
                short_description: cell(3),
                top_notes: cell(4),
                heart_notes: cell(5),
                base_notes: cell(6),
                key_ingredients: cell(7),
                origin_country: cell(8),
                status: cell(9),
                notes: cell(10),
                price_500ml: cell(11),
                price_150ml: cell(12),
                price_60ml: cell(13),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_commas_and_doubled_quotes() {
        let rows = parse_rows("Name,Desc\n\"Rose, Noir\",\"A \"\"bold\"\" scent\"");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], vec!["Rose, Noir", "A \"bold\" scent"]);
    }

    #[test]
    fn quoted_newline_stays_inside_field() {
        let rows = parse_rows("Name,Notes\nVelvet,\"line one\nline two\"");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][1], "line one\nline two");
    }

    #[test]
    fn crlf_and_bare_cr_both_terminate_rows() {
        let rows = parse_rows("a,b\r\nc,d\re,f");
        assert_eq!(rows, vec![vec!["a", "b"], vec!["c", "d"], vec!["e", "f"]]);
    }

    #[test]
    fn blank_rows_are_dropped() {
        let rows = parse_rows("a,b\n\n , \nc,d\n");
        assert_eq!(rows, vec![vec!["a", "b"], vec!["c", "d"]]);
    }

    #[test]
    fn last_row_without_trailing_newline_is_kept() {
        let rows = parse_rows("a,b");
        assert_eq!(rows, vec![vec!["a", "b"]]);
    }

    #[test]
    fn header_matching_is_case_insensitive_and_order_independent() {
        let rows = parse_rows("family,NAME,id\nCiprée,Velvet,7");
        let scents = rows_to_scents(&rows);
        assert_eq!(scents.len(), 1);
        assert_eq!(scents[0].id, "7");
        assert_eq!(scents[0].name, "Velvet");
        assert_eq!(scents[0].family, "Ciprée");
        assert_eq!(scents[0].top_notes, "");
        assert_eq!(scents[0].price_500ml, "");
    }

    #[test]
    fn legacy_schema_without_price_columns() {
        let rows = parse_rows(
            "ID,Name,Family,Short Description,Top Notes,Heart Notes,Base Notes,Key Ingredients,Origin Country,Status,Notes\n\
             1,Oud Royal,Woody,Deep,bergamot,rose,oud; musk,oud oil,FR,Active,",
        );
        let scents = rows_to_scents(&rows);
        assert_eq!(scents.len(), 1);
        assert_eq!(scents[0].base_notes, "oud; musk");
        assert_eq!(scents[0].price_500ml, "");
        assert_eq!(scents[0].price_150ml, "");
        assert_eq!(scents[0].price_60ml, "");
    }

    #[test]
    fn short_data_rows_pad_with_empty_strings() {
        let rows = parse_rows("ID,Name,Family\n1,Velvet");
        let scents = rows_to_scents(&rows);
        assert_eq!(scents[0].name, "Velvet");
        assert_eq!(scents[0].family, "");
    }

    #[test]
    fn header_only_body_yields_no_records() {
        let rows = parse_rows("ID,Name,Family\n");
        assert_eq!(rows.len(), 1);
        assert!(rows_to_scents(&rows).is_empty());
    }
}
