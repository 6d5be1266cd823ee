//! The built-in Snippet Status Report schema.
//!
//! Equivalent to the following proto2 file; declared field order is the
//! CSV column order.
//!
//! ```text
//! package snippet_status_report;
//!
//! message SnippetStatusReport {
//!   repeated SnippetStatusItem snippet_status = 1;
//! }
//!
//! message SnippetStatusItem {
//!   enum Source { RTB = 1; NON_RTB = 2; }
//!   enum Status { NOT_CHECKED = 0; APPROVED = 1; DISAPPROVED = 2; CONDITIONALLY_APPROVED = 3; }
//!   required string buyer_creative_id = 1;
//!   optional Source source = 2;
//!   optional Status status = 3;
//!   repeated int64 advertiser_id = 4;
//!   repeated string click_through_url = 5;
//!   optional int32 width = 6;
//!   optional int32 height = 7;
//!   repeated int32 attribute = 8;
//!   repeated int32 detected_product_category = 9;
//!   repeated int32 detected_sensitive_category = 10;
//!   repeated DisapprovalReason disapproval_reason = 11;
//!   repeated SnippetCorrection snippet_correction = 12;
//!   optional SnippetFiltering snippet_filtering = 13;
//!   optional bool is_ssl_capable = 14;
//!   optional string DEPRECATED_html_snippet = 15;
//! }
//! ```

use std::sync::LazyLock;

use prost_reflect::MessageDescriptor;
use prost_types::{DescriptorProto, FileDescriptorProto};
use snippet_report_core::descriptor::{
    Label, Type, enum_type, enumeration, message, message_type, scalar,
};

use crate::error::{Result, SchemaError};
use crate::registry::SchemaRegistry;

/// Package of the built-in schema.
pub const PACKAGE: &str = "snippet_status_report";

/// Fully-qualified name of the report message.
pub const REPORT_MESSAGE: &str = "snippet_status_report.SnippetStatusReport";

/// Fully-qualified name of the per-creative item message.
pub const ITEM_MESSAGE: &str = "snippet_status_report.SnippetStatusItem";

/// Prefix marking item fields kept only for wire compatibility. Such fields
/// are left out of tabular output.
pub const DEPRECATED_PREFIX: &str = "DEPRECATED_";

const DISAPPROVAL_REASONS: &[&str] = &[
    "LENGTH_OF_IMAGE_ANIMATION",
    "BROKEN_URL",
    "MEDIA_NOT_FUNCTIONAL",
    "INVALID_FOURTH_PARTY_CALL",
    "INCORRECT_REMARKETING_DECLARATION",
    "LANDING_PAGE_ERROR",
    "AD_SIZE_DOES_NOT_MATCH_AD_SLOT",
    "NO_BORDER",
    "FOURTH_PARTY_BROWSER_COOKIES",
    "LSO_OBJECTS",
    "BLANK_CREATIVE",
    "DESTINATION_URLS_UNDECLARED",
    "PROBLEM_WITH_CLICK_MACRO",
    "INCORRECT_AD_TECHNOLOGY_DECLARATION",
    "INCORRECT_DESTINATION_URL_DECLARATION",
    "EXPANDABLE_INCORRECT_DIRECTION",
    "EXPANDABLE_DIRECTION_NOT_SUPPORTED",
    "EXPANDABLE_INVALID_VENDOR",
    "EXPANDABLE_FUNCTIONALITY",
    "VIDEO_INVALID_VENDOR",
    "VIDEO_UNSUPPORTED_LENGTH",
    "VIDEO_UNSUPPORTED_FORMAT",
    "VIDEO_FUNCTIONALITY",
    "LANDING_PAGE_DISABLED",
    "MALWARE_SUSPECTED",
    "ADULT_IMAGE_OR_VIDEO",
    "INACCURATE_AD_TEXT",
    "COUNTERFEIT_DESIGNER_GOODS",
    "POP_UP",
    "INVALID_RTB_PROTOCOL_USAGE",
    "RAW_IP_ADDRESS_IN_SNIPPET",
    "UNACCEPTABLE_CONTENT_SOFTWARE",
    "UNAUTHORIZED_COOKIE_ON_GOOGLE_DOMAIN",
    "UNDECLARED_FLASH_OBJECTS",
    "INVALID_SSL_DECLARATION",
    "DIRECT_DOWNLOAD_IN_AD",
    "MAXIMUM_DOWNLOAD_SIZE_EXCEEDED",
    "DESTINATION_URL_SITE_NOT_CRAWLABLE",
    "BAD_URL_LEGAL_DISAPPROVAL",
    "PHARMA_GAMBLING_ALCOHOL_NOT_ALLOWED",
    "DYNAMIC_DNS_AT_DESTINATION_URL",
    "POOR_IMAGE_OR_VIDEO_QUALITY",
    "UNACCEPTABLE_IMAGE_CONTENT",
    "INCORRECT_IMAGE_LAYOUT",
    "IRRELEVANT_IMAGE_OR_VIDEO",
    "DESTINATION_SITE_DOES_NOT_ALLOW_GOING_BACK",
    "MISLEADING_CLAIMS_IN_AD",
    "RESTRICTED_PRODUCTS",
    "UNACCEPTABLE_CONTENT",
    "AUTOMATED_AD_CLICKING",
    "INVALID_URL_PROTOCOL",
    "UNDECLARED_RESTRICTED_CONTENT",
    "INVALID_REMARKETING_LIST_USAGE",
    "DESTINATION_SITE_NOT_CRAWLABLE_ROBOTS_TXT",
    "CLICK_TO_DOWNLOAD_NOT_AN_APP",
    "INACCURATE_REVIEW_EXTENSION",
    "SEXUALLY_EXPLICIT_CONTENT",
    "GAINING_AN_UNFAIR_ADVANTAGE",
    "GAMING_THE_GOOGLE_NETWORK",
    "DANGEROUS_PRODUCTS_KNIVES",
    "DANGEROUS_PRODUCTS_EXPLOSIVES",
    "DANGEROUS_PRODUCTS_GUNS",
    "DANGEROUS_PRODUCTS_DRUGS",
    "DANGEROUS_PRODUCTS_TOBACCO",
    "DANGEROUS_PRODUCTS_WEAPONS",
    "UNCLEAR_OR_IRRELEVANT_AD",
    "PROFESSIONAL_STANDARDS",
    "DYSFUNCTIONAL_PROMOTION",
    "INVALID_INTEREST_BASED_AD",
    "MISUSE_OF_PERSONAL_INFORMATION",
    "OMISSION_OF_RELEVANT_INFORMATION",
    "UNAVAILABLE_PROMOTIONS",
    "MISLEADING_PROMOTIONS",
    "INAPPROPRIATE_CONTENT",
    "SENSITIVE_EVENTS",
    "SHOCKING_CONTENT",
    "ENABLING_DISHONEST_BEHAVIOR",
    "TECHNICAL_REQUIREMENTS",
    "RESTRICTED_POLITICAL_CONTENT",
    "UNSUPPORTED_CONTENT",
    "INVALID_BIDDING_METHOD",
    "VIDEO_TOO_LONG",
    "VIOLATES_JAPANESE_POLICY",
    "INVALID_ZIP_CODE_IN_AD",
];

// The listing API also reports FLASHLESS_ATTRIBUTE, which has no value here;
// the correction pass strips it before decoding.
const CORRECTION_TYPES: &[&str] = &[
    "VENDOR_IDS",
    "SSL_ATTRIBUTE",
    "FLASH_ATTRIBUTE",
    "RICH_MEDIA_ATTRIBUTE",
    "ALL_ATTRIBUTES",
    "VIDEO_IN_SNIPPET_ATTRIBUTE",
    "COOKIE_ATTRIBUTE",
    "REQUIRED_FIELDS_ATTRIBUTE",
];

/// The built-in schema with its two top-level message types resolved.
#[derive(Debug, Clone)]
pub struct ReportSchema {
    registry: SchemaRegistry,
    report: MessageDescriptor,
    item: MessageDescriptor,
}

impl ReportSchema {
    /// Builds the schema. Prefer [`report_schema`], which builds it once per
    /// process.
    ///
    /// # Errors
    ///
    /// Returns an error only if the declarations below fail to link.
    pub fn build() -> Result<Self> {
        let registry = SchemaRegistry::from_files([snippet_status_report_file()])?;
        let report = registry.message(REPORT_MESSAGE)?;
        let item = registry.message(ITEM_MESSAGE)?;
        Ok(Self {
            registry,
            report,
            item,
        })
    }

    /// The registry holding the schema.
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// `SnippetStatusReport`.
    pub fn report(&self) -> &MessageDescriptor {
        &self.report
    }

    /// `SnippetStatusItem`.
    pub fn item(&self) -> &MessageDescriptor {
        &self.item
    }

    /// Names of the item fields shown in tabular output, in declaration
    /// order.
    pub fn item_columns(&self) -> Vec<String> {
        self.item
            .fields()
            .map(|field| field.name().to_string())
            .filter(|name| !name.starts_with(DEPRECATED_PREFIX))
            .collect()
    }
}

static REPORT_SCHEMA: LazyLock<Result<ReportSchema>> = LazyLock::new(ReportSchema::build);

/// Returns the process-wide built-in schema, building it on first use.
///
/// # Errors
///
/// Returns [`SchemaError::BuiltIn`] if the schema failed to build.
pub fn report_schema() -> Result<&'static ReportSchema> {
    match &*REPORT_SCHEMA {
        Ok(schema) => Ok(schema),
        Err(err) => Err(SchemaError::BuiltIn(err.to_string())),
    }
}

/// Declares the `snippet_status_report` proto file.
pub fn snippet_status_report_file() -> FileDescriptorProto {
    use Label::{Optional, Repeated, Required};

    let reasons: Vec<(&str, i32)> = DISAPPROVAL_REASONS.iter().copied().zip(1..).collect();
    let types: Vec<(&str, i32)> = CORRECTION_TYPES.iter().copied().zip(1..).collect();

    let disapproval_reason = DescriptorProto {
        enum_type: vec![enum_type("Reason", &reasons)],
        ..message_type(
            "DisapprovalReason",
            vec![
                enumeration(
                    "reason",
                    1,
                    Optional,
                    ".snippet_status_report.SnippetStatusItem.DisapprovalReason.Reason",
                ),
                scalar("detail", 2, Repeated, Type::String),
            ],
        )
    };

    let snippet_correction = DescriptorProto {
        enum_type: vec![enum_type("Type", &types)],
        ..message_type(
            "SnippetCorrection",
            vec![
                enumeration(
                    "type",
                    1,
                    Optional,
                    ".snippet_status_report.SnippetStatusItem.SnippetCorrection.Type",
                ),
                scalar("detail", 2, Repeated, Type::String),
            ],
        )
    };

    let filtering_item = message_type(
        "Item",
        vec![
            scalar("filtering_count", 1, Optional, Type::Int32),
            scalar("filtering_status", 2, Optional, Type::Int32),
        ],
    );
    let snippet_filtering = DescriptorProto {
        nested_type: vec![filtering_item],
        ..message_type(
            "SnippetFiltering",
            vec![
                scalar("date", 1, Optional, Type::String),
                message(
                    "item",
                    2,
                    Repeated,
                    ".snippet_status_report.SnippetStatusItem.SnippetFiltering.Item",
                ),
            ],
        )
    };

    let item = DescriptorProto {
        nested_type: vec![disapproval_reason, snippet_correction, snippet_filtering],
        enum_type: vec![
            enum_type("Source", &[("RTB", 1), ("NON_RTB", 2)]),
            enum_type(
                "Status",
                &[
                    ("NOT_CHECKED", 0),
                    ("APPROVED", 1),
                    ("DISAPPROVED", 2),
                    ("CONDITIONALLY_APPROVED", 3),
                ],
            ),
        ],
        ..message_type(
            "SnippetStatusItem",
            vec![
                scalar("buyer_creative_id", 1, Required, Type::String),
                enumeration(
                    "source",
                    2,
                    Optional,
                    ".snippet_status_report.SnippetStatusItem.Source",
                ),
                enumeration(
                    "status",
                    3,
                    Optional,
                    ".snippet_status_report.SnippetStatusItem.Status",
                ),
                scalar("advertiser_id", 4, Repeated, Type::Int64),
                scalar("click_through_url", 5, Repeated, Type::String),
                scalar("width", 6, Optional, Type::Int32),
                scalar("height", 7, Optional, Type::Int32),
                scalar("attribute", 8, Repeated, Type::Int32),
                scalar("detected_product_category", 9, Repeated, Type::Int32),
                scalar("detected_sensitive_category", 10, Repeated, Type::Int32),
                message(
                    "disapproval_reason",
                    11,
                    Repeated,
                    ".snippet_status_report.SnippetStatusItem.DisapprovalReason",
                ),
                message(
                    "snippet_correction",
                    12,
                    Repeated,
                    ".snippet_status_report.SnippetStatusItem.SnippetCorrection",
                ),
                message(
                    "snippet_filtering",
                    13,
                    Optional,
                    ".snippet_status_report.SnippetStatusItem.SnippetFiltering",
                ),
                scalar("is_ssl_capable", 14, Optional, Type::Bool),
                scalar("DEPRECATED_html_snippet", 15, Optional, Type::String),
            ],
        )
    };

    let report = message_type(
        "SnippetStatusReport",
        vec![message(
            "snippet_status",
            1,
            Repeated,
            ".snippet_status_report.SnippetStatusItem",
        )],
    );

    FileDescriptorProto {
        name: Some("snippet_status_report.proto".to_string()),
        package: Some(PACKAGE.to_string()),
        syntax: Some("proto2".to_string()),
        message_type: vec![report, item],
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use prost_reflect::{Cardinality, Kind};

    use super::*;

    #[test]
    fn test_builds_once_per_process() {
        let first = report_schema().unwrap();
        let second = report_schema().unwrap();
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn test_item_columns_skip_deprecated_fields() {
        let columns = report_schema().unwrap().item_columns();
        assert_eq!(columns.len(), 14);
        assert_eq!(columns.first().map(String::as_str), Some("buyer_creative_id"));
        assert_eq!(columns.last().map(String::as_str), Some("is_ssl_capable"));
        assert!(!columns.iter().any(|c| c.starts_with(DEPRECATED_PREFIX)));
    }

    #[test]
    fn test_buyer_creative_id_is_required() {
        let item = report_schema().unwrap().item().clone();
        let field = item.get_field_by_name("buyer_creative_id").unwrap();
        assert_eq!(field.cardinality(), Cardinality::Required);
    }

    #[test]
    fn test_correction_types_exclude_flashless() {
        let item = report_schema().unwrap().item().clone();
        let field = item.get_field_by_name("snippet_correction").unwrap();
        let Kind::Message(correction) = field.kind() else {
            panic!("snippet_correction is a message field");
        };
        let Kind::Enum(types) = correction.get_field_by_name("type").unwrap().kind() else {
            panic!("type is an enum field");
        };
        assert!(types.get_value_by_name("SSL_ATTRIBUTE").is_some());
        assert!(types.get_value_by_name("FLASHLESS_ATTRIBUTE").is_none());
    }

    #[test]
    fn test_disapproval_reasons_include_ssl_sentinel() {
        let item = report_schema().unwrap().item().clone();
        let field = item.get_field_by_name("disapproval_reason").unwrap();
        let Kind::Message(reason) = field.kind() else {
            panic!("disapproval_reason is a message field");
        };
        let Kind::Enum(reasons) = reason.get_field_by_name("reason").unwrap().kind() else {
            panic!("reason is an enum field");
        };
        assert!(reasons.get_value_by_name("INVALID_SSL_DECLARATION").is_some());
        assert!(reasons.get_value_by_name("PROBLEM_WITH_CLICK_MACRO").is_some());
    }
}
