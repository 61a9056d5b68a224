//! RDS lookup tables
//!
//! Program type names for both regional standards, group type
//! descriptions and the registered open-data-application identifiers.

use crate::types::{GroupType, ProgramType, PtyRegion, Version};

/// Program types, RBDS (North America)
const PTY_NORTH_AMERICA: [&str; 32] = [
    "No program type",
    "News",
    "Information",
    "Sports",
    "Talk",
    "Rock",
    "Classic Rock",
    "Adult Hits",
    "Soft Rock",
    "Top 40",
    "Country",
    "Oldies",
    "Soft",
    "Nostalgia",
    "Jazz",
    "Classical",
    "Rhythm and Blues",
    "Soft Rhythm and Blues",
    "Language",
    "Religious Music",
    "Religious Talk",
    "Personality",
    "Public",
    "College",
    "Unassigned 24",
    "Unassigned 25",
    "Unassigned 26",
    "Unassigned 27",
    "Unassigned 28",
    "Weather",
    "Emergency Test",
    "Emergency",
];

/// Program types, RDS (Europe)
const PTY_EUROPE: [&str; 32] = [
    "No program type",
    "News",
    "Current Affairs",
    "Information",
    "Sport",
    "Education",
    "Drama",
    "Culture",
    "Science",
    "Varied",
    "Pop Music",
    "Rock Music",
    "M.O.R. Music",
    "Light Classical",
    "Serious Classical",
    "Other Music",
    "Weather",
    "Finance",
    "Children's Programs",
    "Social Affairs",
    "Religion",
    "Phone-In",
    "Travel",
    "Leisure",
    "Jazz Music",
    "Country Music",
    "National Music",
    "Oldies Music",
    "Folk Music",
    "Documentary",
    "Alarm test",
    "Alarm",
];

const GROUP_TYPES_A: [&str; 16] = [
    "Basic Tuning and Switching Information only",
    "Program Item Number and Slow Labeling Codes only",
    "Radio Text only",
    "Applications Identification for ODA only",
    "Clock Time and Date only",
    "Transparent Data Channels (32 channels) or ODA",
    "In-House Applications of ODA",
    "Radio Paging of ODA",
    "Traffic Message Channel or ODA",
    "Emergency Warning System or ODA",
    "Program Type Name",
    "Open Data Applications",
    "Open Data Applications",
    "Enhanced Radio Paging or ODA",
    "Enhanced Other Networks Information Only",
    "Defined in RBDS only",
];

const GROUP_TYPES_B: [&str; 16] = [
    "Basic Tuning and Switching Information only",
    "Program Item Number",
    "Radio Text only",
    "Open Data Applications",
    "Open Data Applications",
    "Transparent Data Channels (32 channels) or ODA",
    "In-House Applications of ODA",
    "Radio Paging of ODA",
    "Open Data Applications",
    "Open Data Applications",
    "Open Data Applications",
    "Open Data Applications",
    "Open Data Applications",
    "Open Data Applications",
    "Enhanced Other Networks Information Only",
    "Fast Switching Information only",
];

/// Registered ODA application IDs, sorted by ID for binary search
const ODA_APPLICATIONS: &[(u16, &str)] = &[
    (0x0093, "Cross referencing DAB within RDS"),
    (0x0BCB, "Leisure & Practical Info for Drivers"),
    (0x0CC1, "Wireless Playground broadcast control signal"),
    (0x0D45, "RDS-TMC: ALERT-C / EN ISO 14819-1"),
    (0x125F, "I-FM-RDS for fixed and mobile devices"),
    (0x1C68, "ITIS In-vehicle data base"),
    (0x1DC5, "Encrypted TTI using ALERT-Plus"),
    (0x4400, "RDS-Light"),
    (0x4AA1, "RASANT"),
    (0x4BD7, "RadioText+ (RT+)"),
    (0x4BD8, "RadioText Plus / RT+ for eRT"),
    (0x4D87, "Radio Commerce System (RCS)"),
    (0x50DD, "To warn people in case of disasters or emergency"),
    (0x5757, "Personal weather station"),
    (0x6552, "Enhanced RadioText (eRT)"),
    (0x6A7A, "Warning receiver"),
    (0x7373, "Enhanced early warning system"),
    (0xA112, "NL Alert system"),
    (0xA911, "Data FM Selective Multipoint Messaging"),
    (0xABCF, "RF Power Monitoring"),
    (0xC350, "NRSC Song Title and Artist"),
    (0xC3A1, "Personal Radio Service"),
    (0xC3B0, "iTunes Tagging"),
    (0xC3C3, "NAVTEQ Traffic Plus"),
    (0xC4D4, "eEAS"),
    (0xC549, "Smart Grid Broadcast Channel"),
    (0xC563, "ID Logic"),
    (0xC737, "Utility Message Channel (UMC)"),
    (0xCD46, "RDS-TMC: ALERT-C"),
    (0xCD47, "RDS-TMC: ALERT-C"),
    (0xE123, "APS Gateway"),
    (0xE1C1, "Action code"),
    (0xE411, "Beacon downlink"),
    (0xE911, "EAS open protocol"),
    (0xFF7F, "RFT: Station logo"),
    (0xFF80, "RFT+ (work title)"),
];

/// Name of a program type code in the given region's table
#[must_use]
pub fn program_type_name(pty: ProgramType, region: PtyRegion) -> &'static str {
    let index = usize::from(pty.code());
    match region {
        PtyRegion::NorthAmerica => PTY_NORTH_AMERICA[index],
        PtyRegion::Europe => PTY_EUROPE[index],
    }
}

/// Description of a group type / version combination
#[must_use]
pub fn group_type_name(group_type: GroupType, version: Version) -> &'static str {
    let index = usize::from(group_type.value());
    match version {
        Version::A => GROUP_TYPES_A[index],
        Version::B => GROUP_TYPES_B[index],
    }
}

/// Registered name for an ODA application ID
#[must_use]
pub fn oda_application_name(aid: u16) -> Option<&'static str> {
    ODA_APPLICATIONS
        .binary_search_by_key(&aid, |&(id, _)| id)
        .ok()
        .map(|i| ODA_APPLICATIONS[i].1)
}
