//! Share command - template a result into an e-mail or SMS and its deep link

use super::{disclaimer, program_heading, PurchaseArgs};
use crate::core::{CalculationResult, RateEngine};
use crate::money::{compact_aud, display_aud};
use anyhow::Context;
use clap::{Args, Subcommand};

/// Characters in a single-part SMS.
pub const SMS_LIMIT: usize = 160;
/// Length at which the SMS is reported as close to the limit.
pub const SMS_WARNING: usize = 140;

#[derive(Args, Debug)]
pub struct ShareCommand {
    #[command(subcommand)]
    channel: ShareChannel,
}

#[derive(Subcommand, Debug)]
enum ShareChannel {
    /// Compose an e-mail with the full breakdown
    Email(EmailArgs),
    /// Compose a compact SMS
    Sms(SmsArgs),
}

#[derive(Args, Debug)]
struct EmailArgs {
    #[command(flatten)]
    purchase: PurchaseArgs,

    /// Recipient e-mail address
    #[arg(long)]
    to: String,

    /// Sender name shown at the top of the message
    #[arg(long)]
    from: Option<String>,

    #[arg(long, default_value = "Stamp Duty Calculation Results")]
    subject: String,

    /// Personal message placed before the results
    #[arg(short, long)]
    message: Option<String>,

    /// Closing lines appended after the disclaimer
    #[arg(long)]
    signature: Option<String>,

    #[command(flatten)]
    delivery: Delivery,
}

#[derive(Args, Debug)]
struct SmsArgs {
    #[command(flatten)]
    purchase: PurchaseArgs,

    /// Recipient phone number
    #[arg(long)]
    to: String,

    /// Personal message placed before the results
    #[arg(short, long)]
    message: Option<String>,

    /// Closing lines appended after the results
    #[arg(long)]
    signature: Option<String>,

    #[command(flatten)]
    delivery: Delivery,
}

#[derive(Args, Debug)]
struct Delivery {
    /// Print the mailto:/sms: link instead of the message text
    #[arg(long)]
    link: bool,

    /// Open the link with the system's default handler
    #[arg(long)]
    open: bool,
}

impl Delivery {
    fn deliver(&self, message: &str, link: &str) -> anyhow::Result<()> {
        if self.link {
            println!("{link}");
        } else {
            println!("{message}");
        }
        if self.open {
            log::info!("Opening {}", link.split(':').next().unwrap_or("link"));
            opener::open(link).context("Failed to open the message link")?;
        }
        Ok(())
    }
}

/// How an SMS body fits the single-message budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmsLength {
    Fits,
    NearLimit,
    MultiPart,
}

impl SmsLength {
    pub fn of(body: &str) -> Self {
        match body.chars().count() {
            n if n > SMS_LIMIT => SmsLength::MultiPart,
            n if n > SMS_WARNING => SmsLength::NearLimit,
            _ => SmsLength::Fits,
        }
    }
}

impl ShareCommand {
    pub fn exec(&self, engine: &RateEngine) -> anyhow::Result<()> {
        match &self.channel {
            ShareChannel::Email(args) => {
                let result = args.purchase.calculate(engine)?;
                let details = PurchaseDetails {
                    first_home_buyer: args.purchase.first_home_buyer(),
                    principal_residence: args.purchase.residence(),
                    jurisdiction: engine.jurisdiction(),
                };
                let body = email_body(
                    &result,
                    &details,
                    args.from.as_deref(),
                    args.message.as_deref(),
                    args.signature.as_deref(),
                );
                let link = mailto_link(&args.to, &args.subject, &body);
                args.delivery.deliver(&body, &link)
            }
            ShareChannel::Sms(args) => {
                let result = args.purchase.calculate(engine)?;
                let body = sms_body(&result, args.message.as_deref(), args.signature.as_deref());
                let count = body.chars().count();
                match SmsLength::of(&body) {
                    SmsLength::Fits => eprintln!("Characters: {count}/{SMS_LIMIT}"),
                    SmsLength::NearLimit => {
                        log::warn!("SMS is {} characters, close to the {} limit", count, SMS_LIMIT);
                        eprintln!("Characters: {count}/{SMS_LIMIT} (close to the limit)");
                    }
                    SmsLength::MultiPart => {
                        log::warn!("SMS is {} characters and will be sent in several parts", count);
                        eprintln!("Characters: {count}/{SMS_LIMIT} (will be split into several messages)");
                    }
                }
                let link = sms_link(&args.to, &body);
                args.delivery.deliver(&body, &link)
            }
        }
    }
}

/// Buyer status and jurisdiction shown in the e-mail.
pub struct PurchaseDetails<'a> {
    pub first_home_buyer: bool,
    pub principal_residence: bool,
    pub jurisdiction: &'a str,
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

pub fn email_body(
    result: &CalculationResult,
    details: &PurchaseDetails,
    sender: Option<&str>,
    message: Option<&str>,
    signature: Option<&str>,
) -> String {
    let title = format!("Stamp Duty Calculation Results ({})", details.jurisdiction);
    let mut body = String::new();
    body.push_str(&format!("{title}\n"));
    body.push_str(&format!("{}\n\n", "=".repeat(title.chars().count())));

    if let Some(sender) = sender.filter(|s| !s.trim().is_empty()) {
        body.push_str(&format!("From: {sender}\n\n"));
    }
    if let Some(message) = message.filter(|m| !m.trim().is_empty()) {
        body.push_str(message);
        body.push_str("\n\n");
    }

    body.push_str("PROPERTY DETAILS:\n");
    body.push_str(&format!("Property Value: {}\n", display_aud(result.property_value)));
    body.push_str(&format!("First Home Buyer: {}\n", yes_no(details.first_home_buyer)));
    body.push_str(&format!(
        "Principal Place of Residence: {}\n\n",
        yes_no(details.principal_residence)
    ));

    body.push_str("CALCULATION RESULTS:\n");
    body.push_str(&format!("Stamp Duty: {}\n", display_aud(result.duty_payable)));
    body.push_str(&format!("Titles Office Fee: {}\n", display_aud(result.registration_fee)));
    body.push_str(&format!("Total Fees: {}\n\n", display_aud(result.total)));

    if let (Some(heading), Some(description)) = (
        program_heading(result.applied_program),
        result.program_description.as_deref(),
    ) {
        body.push_str(&format!("{}:\n", heading.to_uppercase()));
        body.push_str(&format!("{description}\n"));
        body.push_str(&format!("Savings: {}\n\n", display_aud(result.savings)));
    }

    body.push_str("DISCLAIMER:\n");
    body.push_str(&disclaimer(details.jurisdiction));
    if let Some(signature) = signature.filter(|s| !s.trim().is_empty()) {
        body.push_str("\n\n");
        body.push_str(signature);
    }
    body
}

pub fn sms_body(result: &CalculationResult, message: Option<&str>, signature: Option<&str>) -> String {
    let mut body = String::new();
    if let Some(message) = message.filter(|m| !m.trim().is_empty()) {
        body.push_str(message);
        body.push_str("\n\n");
    }
    body.push_str("Stamp Duty Results:\n");
    body.push_str(&format!("Property: {}\n", compact_aud(result.property_value)));
    body.push_str(&format!("Stamp Duty: {}\n", compact_aud(result.duty_payable)));
    body.push_str(&format!("Titles Fee: {}\n", compact_aud(result.registration_fee)));
    body.push_str(&format!("Total: {}", compact_aud(result.total)));
    if result.savings > rust_decimal::Decimal::ZERO {
        body.push_str(&format!("\nSavings: {}", compact_aud(result.savings)));
    }
    if let Some(signature) = signature.filter(|s| !s.trim().is_empty()) {
        body.push_str("\n\n");
        body.push_str(signature);
    }
    body
}

pub fn mailto_link(to: &str, subject: &str, body: &str) -> String {
    format!(
        "mailto:{}?subject={}&body={}",
        to.trim(),
        urlencoding::encode(subject),
        urlencoding::encode(body)
    )
}

pub fn sms_link(to: &str, body: &str) -> String {
    format!("sms:{}?body={}", to.trim(), urlencoding::encode(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn details() -> PurchaseDetails<'static> {
        PurchaseDetails {
            first_home_buyer: true,
            principal_residence: false,
            jurisdiction: "Victoria 2025",
        }
    }

    fn concession() -> CalculationResult {
        RateEngine::victoria_2025()
            .calculate(dec!(700000), true, false)
            .unwrap()
    }

    #[test]
    fn email_lists_line_items_and_program() {
        let body = email_body(&concession(), &details(), Some("Sam"), Some("As discussed"), None);
        assert!(body.starts_with("Stamp Duty Calculation Results (Victoria 2025)\n====="));
        assert!(body.contains("From: Sam\n\nAs discussed\n\n"));
        assert!(body.contains("Property Value: $700,000.00"));
        assert!(body.contains("First Home Buyer: Yes"));
        assert!(body.contains("Principal Place of Residence: No"));
        assert!(body.contains("Stamp Duty: $24,713.33"));
        assert!(body.contains("Titles Office Fee: $1,739.50"));
        assert!(body.contains("Total Fees: $26,452.83"));
        assert!(body.contains("CONCESSION APPLIED:\nFirst home buyer concession"));
        assert!(body.contains("Savings: $12,356.67"));
        assert!(body.ends_with("precise calculations."));
    }

    #[test]
    fn email_without_program_omits_program_section() {
        let result = RateEngine::victoria_2025()
            .calculate(dec!(800000), false, false)
            .unwrap();
        let body = email_body(&result, &details(), None, Some("  "), Some("Regards,\nSam"));
        assert!(!body.contains("From:"));
        assert!(!body.contains("APPLIED"));
        assert!(!body.contains("Savings"));
        assert!(body.ends_with("\n\nRegards,\nSam"));
    }

    #[test]
    fn email_sections_are_separated_by_blank_lines() {
        let result = RateEngine::victoria_2025()
            .calculate(dec!(600000), false, false)
            .unwrap();
        let details = PurchaseDetails {
            first_home_buyer: false,
            principal_residence: false,
            jurisdiction: "Victoria 2025",
        };
        let body = email_body(&result, &details, None, None, None);
        let expected = format!(
            "Stamp Duty Calculation Results (Victoria 2025)\n{}\n\n\
             PROPERTY DETAILS:\n\
             Property Value: $600,000.00\n\
             First Home Buyer: No\n\
             Principal Place of Residence: No\n\n\
             CALCULATION RESULTS:\n\
             Stamp Duty: $31,070.00\n\
             Titles Office Fee: $1,505.50\n\
             Total Fees: $32,575.50\n\n\
             DISCLAIMER:\n{}",
            "=".repeat(46),
            disclaimer("Victoria 2025")
        );
        assert_eq!(body, expected);
    }

    #[test]
    fn sms_uses_whole_dollars() {
        let body = sms_body(&concession(), None, None);
        assert_eq!(
            body,
            "Stamp Duty Results:\nProperty: $700,000\nStamp Duty: $24,713\nTitles Fee: $1,740\nTotal: $26,453\nSavings: $12,357"
        );
        assert_eq!(SmsLength::of(&body), SmsLength::Fits);
    }

    #[test]
    fn sms_length_thresholds() {
        assert_eq!(SmsLength::of(&"a".repeat(140)), SmsLength::Fits);
        assert_eq!(SmsLength::of(&"a".repeat(141)), SmsLength::NearLimit);
        assert_eq!(SmsLength::of(&"a".repeat(160)), SmsLength::NearLimit);
        assert_eq!(SmsLength::of(&"a".repeat(161)), SmsLength::MultiPart);
    }

    #[test]
    fn long_signature_pushes_sms_over_limit() {
        let body = sms_body(&concession(), Some("Hi Alex"), Some(&"x".repeat(80)));
        assert!(body.starts_with("Hi Alex\n\nStamp Duty Results:"));
        assert_eq!(SmsLength::of(&body), SmsLength::MultiPart);
    }

    #[test]
    fn links_are_url_encoded() {
        assert_eq!(
            mailto_link("a@b.com", "Stamp Duty", "Total: $1,505.50\nDone"),
            "mailto:a@b.com?subject=Stamp%20Duty&body=Total%3A%20%241%2C505.50%0ADone"
        );
        assert_eq!(sms_link(" 0400000000 ", "A & B"), "sms:0400000000?body=A%20%26%20B");
    }
}
