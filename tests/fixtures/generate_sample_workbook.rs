// ==========================================
// 样例工作簿生成器
// ==========================================
// 用途: 生成包含三个工作表的样例台账，用于手工验证分析/导入
// 输出: 命令行参数指定的路径（默认 sample_fleet_data.xlsx）
// 工作表: Vehicles (4) / Drivers (4) / Fuel Entries (4)
// ==========================================

use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};
use std::error::Error;
use std::path::PathBuf;

// 单元格取值
#[derive(Clone, Copy)]
enum Cell {
    Text(&'static str),
    Number(f64),
}

use Cell::{Number as N, Text as T};

fn write_sheet(
    worksheet: &mut Worksheet,
    headers: &[&str],
    rows: &[Vec<Cell>],
) -> Result<(), XlsxError> {
    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header)?;
    }
    for (idx, row) in rows.iter().enumerate() {
        let r = (idx + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            match cell {
                Cell::Text(s) => worksheet.write_string(r, col as u16, *s)?,
                Cell::Number(n) => worksheet.write_number(r, col as u16, *n)?,
            };
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let output = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample_fleet_data.xlsx"));

    let mut workbook = Workbook::new();

    // 车辆
    let vehicles = workbook.add_worksheet().set_name("Vehicles")?;
    write_sheet(
        vehicles,
        &["Registration Number", "Make", "Model Year", "Color", "Fuel Type", "Current Odometer", "Status"],
        &[
            vec![T("ABC-123"), T("Toyota"), T("2020"), T("White"), T("Petrol"), N(45000.0), T("active")],
            vec![T("DEF-456"), T("Honda"), T("2019"), T("Blue"), T("Diesel"), N(67000.0), T("active")],
            vec![T("GHI-789"), T("Suzuki"), T("2021"), T("Red"), T("Petrol"), N(23000.0), T("active")],
            vec![T("JKL-012"), T("Nissan"), T("2018"), T("Black"), T("Diesel"), N(89000.0), T("maintenance")],
        ],
    )?;

    // 驾驶员
    let drivers = workbook.add_worksheet().set_name("Drivers")?;
    write_sheet(
        drivers,
        &["Name", "Employee ID", "License Number", "Phone", "License Expiry"],
        &[
            vec![T("John Smith"), T("EMP001"), T("DL12345"), T("555-0001"), T("2025-12-31")],
            vec![T("Jane Doe"), T("EMP002"), T("DL67890"), T("555-0002"), T("2024-06-30")],
            vec![T("Mike Johnson"), T("EMP003"), T("DL11111"), T("555-0003"), T("2026-03-15")],
            vec![T("Sarah Wilson"), T("EMP004"), T("DL22222"), T("555-0004"), T("2025-09-20")],
        ],
    )?;

    // 加油记录
    let fuel = workbook.add_worksheet().set_name("Fuel Entries")?;
    write_sheet(
        fuel,
        &["Vehicle ID", "Date", "Liters", "Cost", "Odometer", "Fuel Type"],
        &[
            vec![T("ABC-123"), T("2024-01-15"), N(45.5), N(2275.0), N(45500.0), T("Petrol")],
            vec![T("DEF-456"), T("2024-01-16"), N(52.3), N(3138.0), N(67200.0), T("Diesel")],
            vec![T("GHI-789"), T("2024-01-17"), N(38.2), N(1910.0), N(23150.0), T("Petrol")],
            vec![T("ABC-123"), T("2024-01-20"), N(41.8), N(2090.0), N(45800.0), T("Petrol")],
        ],
    )?;

    workbook.save(&output)?;

    println!("样例工作簿已生成: {}", output.display());
    println!("包含 3 个工作表: Vehicles (4) / Drivers (4) / Fuel Entries (4)");
    Ok(())
}
