//! xlsx 워크북 읽기/쓰기.
//!
//! 쓰기는 같은 디렉토리의 임시 파일에 저장한 뒤 대상 경로로 rename합니다.
//! 저장이 실패하면 기존 리포트는 그대로 남습니다.

use ah_core::parse_trade_date;
use calamine::{open_workbook, Data, Reader, Xlsx};
use chrono::Datelike;
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
use std::path::Path;
use tracing::debug;

use crate::error::{ReportError, Result};
use crate::sheet::{Cell, SheetTable};

/// 시트들을 워크북 하나로 저장합니다 (기존 파일 교체).
pub fn write_workbook(path: impl AsRef<Path>, sheets: &[SheetTable]) -> Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");

    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet.name)?;

        for (c, header) in sheet.headers.iter().enumerate() {
            worksheet.write_string_with_format(0, column_index(c)?, header, &header_format)?;
        }

        for (r, row) in sheet.rows.iter().enumerate() {
            let r = row_index(r + 1)?;
            for (c, cell) in row.iter().enumerate() {
                let c = column_index(c)?;
                match cell {
                    Cell::Empty => {}
                    Cell::Text(s) => {
                        worksheet.write_string(r, c, s)?;
                    }
                    Cell::Number(v) if v.is_finite() => {
                        worksheet.write_number(r, c, *v)?;
                    }
                    Cell::Number(_) => {}
                    Cell::Date(d) => {
                        let value =
                            ExcelDateTime::from_ymd(year(d.year())?, d.month() as u8, d.day() as u8)?;
                        worksheet.write_datetime_with_format(r, c, &value, &date_format)?;
                    }
                }
            }
        }

        if !sheet.headers.is_empty() {
            worksheet.set_freeze_panes(1, 0)?;
        }
    }

    let temp = tempfile::Builder::new()
        .prefix(".ah-report-")
        .suffix(".xlsx")
        .tempfile_in(dir)?;
    workbook.save(temp.path())?;
    temp.persist(path).map_err(|e| ReportError::Io(e.error))?;

    debug!(path = %path.display(), sheets = sheets.len(), "워크북 저장");
    Ok(())
}

/// 워크북에서 시트 하나를 읽습니다.
pub fn read_sheet(path: impl AsRef<Path>, name: &str) -> Result<SheetTable> {
    let mut workbook: Xlsx<_> = open_workbook(path.as_ref())?;
    read_from(&mut workbook, name)
}

/// 워크북에서 여러 시트를 순서대로 읽습니다.
pub fn read_sheets(path: impl AsRef<Path>, names: &[&str]) -> Result<Vec<SheetTable>> {
    let mut workbook: Xlsx<_> = open_workbook(path.as_ref())?;
    names
        .iter()
        .map(|name| read_from(&mut workbook, name))
        .collect()
}

fn read_from<RS>(workbook: &mut Xlsx<RS>, name: &str) -> Result<SheetTable>
where
    RS: std::io::Read + std::io::Seek,
{
    if !workbook.sheet_names().iter().any(|s| s == name) {
        return Err(ReportError::MissingSheet(name.to_string()));
    }

    let range = workbook.worksheet_range(name)?;
    let mut rows = range.rows();

    let headers = match rows.next() {
        Some(row) => row
            .iter()
            .map(|cell| to_cell(cell).as_text().unwrap_or_default())
            .collect(),
        None => Vec::new(),
    };

    let mut sheet = SheetTable::new(name, headers);
    for row in rows {
        sheet.push_row(row.iter().map(to_cell).collect());
    }
    Ok(sheet)
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::String(s) if s.trim().is_empty() => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(value) => Cell::Date(value.date()),
            None => Cell::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) => match parse_trade_date(s) {
            Ok(date) => Cell::Date(date),
            Err(_) => Cell::Text(s.clone()),
        },
        Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(_) | Data::Empty => Cell::Empty,
    }
}

fn row_index(r: usize) -> Result<u32> {
    u32::try_from(r).map_err(|_| ReportError::Write(format!("행 번호 범위 초과: {}", r)))
}

fn column_index(c: usize) -> Result<u16> {
    u16::try_from(c).map_err(|_| ReportError::Write(format!("열 번호 범위 초과: {}", c)))
}

fn year(y: i32) -> Result<u16> {
    u16::try_from(y).map_err(|_| ReportError::Write(format!("연도 범위 초과: {}", y)))
}
