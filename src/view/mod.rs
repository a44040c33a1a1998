//! HTML rendering for the product page

use crate::qr::{self, QrError};
use crate::store::{Product, SortKey};

/// Shown instead of a table when there are no products
pub const NO_PRODUCTS_MESSAGE: &str = "No products found.";

const TABLE_HEADERS: [&str; 6] = [
    "Product ID",
    "Product Name",
    "Barcode",
    "Expiry Date",
    "Status",
    "QR Code",
];

/// Render the product table, one row per product with an inline QR image.
///
/// An empty slice renders [`NO_PRODUCTS_MESSAGE`] and no table markup.
pub fn render_table(products: &[Product]) -> Result<String, QrError> {
    if products.is_empty() {
        return Ok(format!("<p>{}</p>\n", NO_PRODUCTS_MESSAGE));
    }

    let mut buf = String::new();
    buf.push_str("<table class=\"products\">\n<thead>\n<tr>");
    for header in TABLE_HEADERS {
        buf.push_str("<th>");
        buf.push_str(header);
        buf.push_str("</th>");
    }
    buf.push_str("</tr>\n</thead>\n<tbody>\n");

    for product in products {
        buf.push_str(&render_row(product)?);
    }

    buf.push_str("</tbody>\n</table>\n");
    Ok(buf)
}

fn render_row(product: &Product) -> Result<String, QrError> {
    let png = qr::encode_product(product)?;

    let id = product.id.to_string();

    let mut row = String::from("<tr>");
    for value in [
        id.as_str(),
        product.name.as_str(),
        product.barcode.as_str(),
        product.expiry_date.as_str(),
        product.status.as_str(),
    ] {
        row.push_str("<td>");
        row.push_str(&escape_html(value));
        row.push_str("</td>");
    }
    row.push_str(&format!(
        "<td><img src=\"{}\" alt=\"QR Code\" width=\"100\"></td>",
        qr::to_data_uri(&png)
    ));
    row.push_str("</tr>\n");
    Ok(row)
}

/// Render the whole page: heading, sort selector and the product table
pub fn render_page(sort_key: SortKey, products: &[Product]) -> Result<String, QrError> {
    let mut buf = String::new();

    buf.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    buf.push_str("<meta charset=\"utf-8\">\n<title>View Products</title>\n");
    buf.push_str(STYLE);
    buf.push_str("</head>\n<body>\n");
    buf.push_str("<h1>View Products</h1>\n<h2>List of Products</h2>\n");

    buf.push_str(&render_sort_form(sort_key));
    buf.push_str(&render_table(products)?);

    buf.push_str("</body>\n</html>\n");
    Ok(buf)
}

fn render_sort_form(selected: SortKey) -> String {
    let mut buf = String::from("<form method=\"get\" action=\"/\">\n");
    buf.push_str("<label for=\"sort_by\">Sort by</label>\n");
    buf.push_str("<select id=\"sort_by\" name=\"sort_by\" onchange=\"this.form.submit()\">\n");

    for key in SortKey::ALL {
        let marker = if key == selected { " selected" } else { "" };
        buf.push_str(&format!(
            "<option value=\"{label}\"{marker}>{label}</option>\n",
            label = key.label(),
            marker = marker
        ));
    }

    buf.push_str("</select>\n<noscript><button type=\"submit\">Apply</button></noscript>\n");
    buf.push_str("</form>\n");
    buf
}

const STYLE: &str = "<style>\n\
body { font-family: sans-serif; margin: 2rem; }\n\
table.products { border-collapse: collapse; margin-top: 1rem; }\n\
table.products th, table.products td { border: 1px solid #ccc; padding: 0.4rem 0.8rem; text-align: left; }\n\
</style>\n";

/// Escape text for use in HTML element content and quoted attributes
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i64, name: &str, status: &str) -> Product {
        Product {
            id,
            name: name.to_string(),
            barcode: format!("BC{}", id),
            expiry_date: "2025-01-01".to_string(),
            status: status.to_string(),
        }
    }

    #[test]
    fn empty_list_shows_message_without_table() {
        let html = render_table(&[]).unwrap();
        assert!(html.contains(NO_PRODUCTS_MESSAGE));
        assert!(!html.contains("<table"));
        assert!(!html.contains("<tr"));
    }

    #[test]
    fn one_row_per_product_with_inline_image() {
        let products = vec![product(1, "Milk", "Active"), product(2, "Bread", "Expired")];
        let html = render_table(&products).unwrap();

        assert_eq!(html.matches("<tr>").count(), 3); // header + 2 rows
        assert_eq!(html.matches("<img src=\"data:image/png;base64,").count(), 2);
        assert!(html.contains("alt=\"QR Code\" width=\"100\""));
        assert!(html.contains("<td>Milk</td>"));
        assert!(html.contains("<td>BC2</td>"));
        for header in TABLE_HEADERS {
            assert!(html.contains(&format!("<th>{}</th>", header)));
        }
        assert!(!html.contains(NO_PRODUCTS_MESSAGE));
    }

    #[test]
    fn rows_keep_input_order() {
        let products = vec![product(7, "Zucchini", "Active"), product(3, "Apple", "Active")];
        let html = render_table(&products).unwrap();

        let zucchini = html.find("Zucchini").unwrap();
        let apple = html.find("Apple").unwrap();
        assert!(zucchini < apple);
    }

    #[test]
    fn field_values_are_escaped() {
        let products = vec![product(1, "<script>alert(\"x\")</script>", "A&B")];
        let html = render_table(&products).unwrap();

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt;"));
        assert!(html.contains("<td>A&amp;B</td>"));
    }

    #[test]
    fn page_marks_current_sort_key() {
        let html = render_page(SortKey::Status, &[]).unwrap();

        assert!(html.contains("<h1>View Products</h1>"));
        assert!(html.contains("<option value=\"Status\" selected>Status</option>"));
        assert!(html.contains("<option value=\"Product ID\">Product ID</option>"));
        assert!(html.contains(NO_PRODUCTS_MESSAGE));
        assert!(!html.contains("<table"));
    }
}
