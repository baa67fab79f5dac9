//! Parser for TAW `GetTrackingInfo` responses.
//!
//! The document root holds zero or more `Record` children:
//!
//! ```xml
//! <TrackingInfo>
//!   <Record>
//!     <TrackNum>1Z999</TrackNum>
//!     <OrderDate>03/05/2024</OrderDate>
//!     <Type>UPS</Type>
//!     <InvoiceNumber>INV-1</InvoiceNumber>
//!   </Record>
//! </TrackingInfo>
//! ```

use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;

use super::TrackingRecord;

/// Errors produced while reading a TAW response.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TawParseError {
    #[error("XML parse error: {0}")]
    Xml(String),

    #[error("Response has no root element")]
    NoRootElement,

    #[error("Unexpected content outside the root element")]
    ContentOutsideRoot,

    #[error("Response ended inside an open element")]
    Truncated,

    #[error("Record {record} has no {element} element")]
    MissingElement {
        record: usize,
        element: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    TrackNum,
    OrderDate,
    Type,
    InvoiceNumber,
}

impl Field {
    fn from_name(name: &[u8]) -> Option<Self> {
        match name {
            b"TrackNum" => Some(Field::TrackNum),
            b"OrderDate" => Some(Field::OrderDate),
            b"Type" => Some(Field::Type),
            b"InvoiceNumber" => Some(Field::InvoiceNumber),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct RawRecord {
    track_num: Option<String>,
    order_date: Option<String>,
    carrier: Option<String>,
    invoice_number: Option<String>,
}

impl RawRecord {
    fn slot(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::TrackNum => &mut self.track_num,
            Field::OrderDate => &mut self.order_date,
            Field::Type => &mut self.carrier,
            Field::InvoiceNumber => &mut self.invoice_number,
        }
    }

    fn open(&mut self, field: Field) {
        *self.slot(field) = Some(String::new());
    }

    fn append(&mut self, field: Field, text: &str) {
        self.slot(field).get_or_insert_with(String::new).push_str(text);
    }

    fn finish(self, record: usize) -> Result<TrackingRecord, TawParseError> {
        let track_num = self.track_num.ok_or(TawParseError::MissingElement {
            record,
            element: "TrackNum",
        })?;

        let mut out = TrackingRecord::new(track_num);
        if let Some(carrier) = self.carrier {
            out = out.with_carrier(carrier);
        }
        if let Some(invoice) = self.invoice_number {
            out = out.with_reference(invoice);
        }
        if let Some(date) = self.order_date {
            out = out.with_order_date(date);
        }
        Ok(out)
    }
}

/// Parse a TAW response body into tracking records, in document order.
///
/// Every `Record` must carry a `TrackNum` element (possibly blank); the
/// other fields are optional here and enforced where they are needed.
pub fn parse_tracking_response(xml: &str) -> Result<Vec<TrackingRecord>, TawParseError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut records = Vec::new();
    let mut depth = 0usize;
    let mut seen_root = false;
    let mut current: Option<RawRecord> = None;
    let mut field: Option<Field> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = e.local_name();
                match depth {
                    0 => {
                        if seen_root {
                            return Err(TawParseError::ContentOutsideRoot);
                        }
                        seen_root = true;
                    }
                    1 if name.as_ref() == b"Record" => {
                        current = Some(RawRecord::default());
                    }
                    2 => {
                        if let Some(record) = current.as_mut() {
                            field = Field::from_name(name.as_ref());
                            if let Some(f) = field {
                                record.open(f);
                            }
                        }
                    }
                    _ => {}
                }
                depth += 1;
            }
            Ok(Event::Empty(e)) => {
                let name = e.local_name();
                match depth {
                    0 => {
                        if seen_root {
                            return Err(TawParseError::ContentOutsideRoot);
                        }
                        seen_root = true;
                    }
                    1 if name.as_ref() == b"Record" => {
                        let position = records.len() + 1;
                        records.push(RawRecord::default().finish(position)?);
                    }
                    2 => {
                        if let (Some(record), Some(f)) =
                            (current.as_mut(), Field::from_name(name.as_ref()))
                        {
                            record.open(f);
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Text(t)) => {
                let text = t
                    .unescape()
                    .map_err(|e| TawParseError::Xml(e.to_string()))?;
                if depth == 0 {
                    if !text.trim().is_empty() {
                        return Err(TawParseError::ContentOutsideRoot);
                    }
                } else if depth == 3 {
                    if let (Some(record), Some(f)) = (current.as_mut(), field) {
                        record.append(f, &text);
                    }
                }
            }
            Ok(Event::CData(c)) => {
                if depth == 3 {
                    if let (Some(record), Some(f)) = (current.as_mut(), field) {
                        record.append(f, &String::from_utf8_lossy(&c.into_inner()));
                    }
                }
            }
            Ok(Event::End(_)) => {
                depth = depth.saturating_sub(1);
                match depth {
                    2 => field = None,
                    1 => {
                        if let Some(record) = current.take() {
                            let position = records.len() + 1;
                            records.push(record.finish(position)?);
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(TawParseError::Xml(e.to_string())),
            _ => {}
        }
    }

    if !seen_root {
        return Err(TawParseError::NoRootElement);
    }
    if depth != 0 {
        return Err(TawParseError::Truncated);
    }

    Ok(records)
}
