use anyhow::Result;
use async_trait::async_trait;
use contracts::usecases::u501_import_sales::request::SessionAssociations;
use contracts::usecases::u501_import_sales::row::RawRow;
use std::collections::BTreeMap;

/// Внешний коллаборатор: разбор загруженного файла в упорядоченные строки.
///
/// Парсер возвращает нормализованные RawRow; определение формата за
/// пределами CSV — вне конвейера.
#[async_trait]
pub trait RowUploader: Send + Sync {
    async fn parse(
        &self,
        file_name: &str,
        bytes: &[u8],
        params: &SessionAssociations,
    ) -> Result<Vec<RawRow>>;
}

/// CSV-парсер: известные заголовки маппятся в поля RawRow, остальные
/// колонки складываются в unmapped.
pub struct CsvUploader;

fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase().replace([' ', '-'], "_")
}

fn parse_number(value: &str) -> Option<f64> {
    // В выгрузках встречается запятая как десятичный разделитель
    value.trim().replace(',', ".").parse::<f64>().ok()
}

fn parse_date(value: &str) -> Option<chrono::NaiveDate> {
    let v = value.trim();
    chrono::NaiveDate::parse_from_str(v, "%Y-%m-%d")
        .or_else(|_| chrono::NaiveDate::parse_from_str(v, "%d.%m.%Y"))
        .ok()
}

impl CsvUploader {
    fn parse_rows(bytes: &[u8]) -> Result<Vec<RawRow>> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(bytes);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(normalize_header)
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let mut row = RawRow::default();
            let mut unmapped = BTreeMap::new();

            for (idx, value) in record.iter().enumerate() {
                if value.is_empty() {
                    continue;
                }
                let header = match headers.get(idx) {
                    Some(h) => h.as_str(),
                    None => continue,
                };
                match header {
                    "customer" | "customer_name" | "client" => {
                        row.customer_name = Some(value.to_string());
                    }
                    "receiver" | "receiver_name" => {
                        row.receiver_name = Some(value.to_string());
                    }
                    "product" | "product_name" | "item" => {
                        row.product_name = Some(value.to_string());
                    }
                    "offer" | "offer_name" | "b2b_offer" => {
                        row.offer_name = Some(value.to_string());
                    }
                    "weight" | "qty" | "quantity" => {
                        row.weight = parse_number(value);
                    }
                    "price" => {
                        row.price = parse_number(value);
                    }
                    "date" => {
                        row.date = parse_date(value);
                    }
                    _ => {
                        unmapped.insert(header.to_string(), value.to_string());
                    }
                }
            }

            row.unmapped = unmapped;
            rows.push(row);
        }

        Ok(rows)
    }
}

#[async_trait]
impl RowUploader for CsvUploader {
    async fn parse(
        &self,
        file_name: &str,
        bytes: &[u8],
        _params: &SessionAssociations,
    ) -> Result<Vec<RawRow>> {
        let rows = Self::parse_rows(bytes)?;
        tracing::info!("Parsed {} rows from {}", rows.len(), file_name);
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_headers_and_collects_unmapped() {
        let csv = "customer_name,product,weight,price,date,region\n\
                   Acme,Wheat,10,25.5,2026-03-01,North\n";
        let rows = CsvUploader::parse_rows(csv.as_bytes()).unwrap();

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.customer_name.as_deref(), Some("Acme"));
        assert_eq!(row.product_name.as_deref(), Some("Wheat"));
        assert_eq!(row.weight, Some(10.0));
        assert_eq!(row.price, Some(25.5));
        assert_eq!(
            row.date,
            chrono::NaiveDate::from_ymd_opt(2026, 3, 1)
        );
        assert_eq!(row.unmapped.get("region").map(String::as_str), Some("North"));
    }

    #[test]
    fn tolerates_decimal_comma_and_dotted_date() {
        let csv = "customer,weight,date\nAcme,\"12,5\",01.03.2026\n";
        let rows = CsvUploader::parse_rows(csv.as_bytes()).unwrap();

        assert_eq!(rows[0].weight, Some(12.5));
        assert_eq!(
            rows[0].date,
            chrono::NaiveDate::from_ymd_opt(2026, 3, 1)
        );
    }

    #[test]
    fn empty_cells_stay_none() {
        let csv = "customer_name,product_name,weight\nAcme,,\n";
        let rows = CsvUploader::parse_rows(csv.as_bytes()).unwrap();

        assert_eq!(rows[0].customer_name.as_deref(), Some("Acme"));
        assert_eq!(rows[0].product_name, None);
        assert_eq!(rows[0].weight, None);
    }

    #[test]
    fn preserves_row_order() {
        let csv = "customer\nFirst\nSecond\nThird\n";
        let rows = CsvUploader::parse_rows(csv.as_bytes()).unwrap();
        let names: Vec<_> = rows
            .iter()
            .map(|r| r.customer_name.clone().unwrap())
            .collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
    }
}
