use serde_json::Value;
use std::io;

use trade_journal_core::trade::Trade;

const EXPORT_HEADERS: [&str; 12] = [
    "ID",
    "Market",
    "Symbol",
    "Side",
    "Entry",
    "Exit",
    "Size",
    "PnL",
    "Confidence",
    "Calm",
    "Urgency",
    "Notes",
];

/// Write command output as CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => write_fields(&mut wtr, result),
            Some(Value::Array(rows)) => write_rows(&mut wtr, rows),
            _ => match map.get("points") {
                Some(Value::Array(points)) => write_rows(&mut wtr, points),
                _ => write_fields(&mut wtr, map),
            },
        },
        Value::Array(arr) => write_rows(&mut wtr, arr),
        _ => {
            let _ = wtr.write_record([&format_csv_value(value)]);
        }
    }

    let _ = wtr.flush();
}

/// Trade export with the journal's fixed column set. Open trades leave
/// `Exit` blank and report a zero `PnL`; missing ratings are blank.
pub fn write_trade_export<W: io::Write>(
    trades: &[Trade],
    writer: W,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(EXPORT_HEADERS)?;
    for t in trades {
        let rating = |pick: fn(&trade_journal_core::psychology::PsychAssessment) -> u8| {
            t.psych.as_ref().map(|p| pick(p).to_string()).unwrap_or_default()
        };
        wtr.write_record([
            t.id.clone(),
            t.market.to_string(),
            t.symbol.clone(),
            t.direction.to_string(),
            t.entry_price.to_string(),
            t.exit_price.map(|p| p.to_string()).unwrap_or_default(),
            t.position_size.to_string(),
            t.pnl().unwrap_or_default().to_string(),
            rating(|p| p.confidence),
            rating(|p| p.calm),
            rating(|p| p.urgency),
            t.notes.clone(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_fields<W: io::Write>(wtr: &mut csv::Writer<W>, map: &serde_json::Map<String, Value>) {
    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in map {
        let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
    }
}

fn write_rows<W: io::Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) {
    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            let _ = wtr.write_record([&format_csv_value(item)]);
        }
        return;
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    let _ = wtr.write_record(&headers);
    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&row);
        }
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use trade_journal_core::psychology::PsychAssessment;
    use trade_journal_core::trade::TradeDraft;

    #[test]
    fn test_export_columns_and_quoting() {
        let closed = Trade::from_draft(
            TradeDraft {
                id: Some("t1".into()),
                symbol: "EURUSD".into(),
                entry_price: dec!(1.08),
                exit_price: Some(dec!(1.09)),
                position_size: dec!(1000),
                notes: "took \"profit\", early".into(),
                psych: Some(PsychAssessment {
                    confidence: 4,
                    calm: 2,
                    urgency: 5,
                    ..Default::default()
                }),
                ..Default::default()
            },
            Utc::now(),
        );
        let open = Trade::from_draft(
            TradeDraft {
                id: Some("t2".into()),
                symbol: "AAPL".into(),
                entry_price: dec!(180),
                ..Default::default()
            },
            Utc::now(),
        );

        let mut buf = Vec::new();
        write_trade_export(&[closed, open], &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "ID,Market,Symbol,Side,Entry,Exit,Size,PnL,Confidence,Calm,Urgency,Notes"
        );
        assert_eq!(
            lines[1],
            "t1,forex,EURUSD,long,1.08,1.09,1000,10.00,4,2,5,\"took \"\"profit\"\", early\""
        );
        assert_eq!(lines[2], "t2,stocks,AAPL,long,180,,1,0,,,,");
    }
}
