//! CSV Output

use crate::report::BenchmarkReport;

/// Generate CSV with one row per recorded or unsupported step.
///
/// Rows follow the report order: sizes ascending, cases in registration
/// order. Unsupported steps leave the numeric columns empty.
pub fn generate_csv_report(report: &BenchmarkReport) -> String {
    let mut output = String::from("size,case,status,total_ns,repeat,per_call_ns,mflops\n");

    for (size, result) in report.iter() {
        for name in report.case_names() {
            let case = escape(name);
            if let Some(o) = result.get(name) {
                let mflops = o.mflops(size).map(|m| format!("{:.3}", m)).unwrap_or_default();
                output.push_str(&format!(
                    "{},{},ok,{},{},{:.3},{}\n",
                    size,
                    case,
                    o.duration_ns,
                    o.repeat,
                    o.per_call_ns(),
                    mflops
                ));
            } else if report.unsupported_at(size, name).is_some() {
                output.push_str(&format!("{},{},unsupported,,,,\n", size, case));
            }
        }
    }

    output
}

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
