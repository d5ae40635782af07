use crate::media::MetaType;
use crate::sidecar::GoogleMetadata;
use crate::tags::structs::{TagValue, WriteTags};

// --- Tag names ---

const SUBSEC_TIME_TAGS: [&str; 3] = [
    "SubSecDateTimeOriginal",
    "SubSecCreateDate",
    "SubSecModifyDate",
];

const QUICKTIME_TIME_TAGS: [&str; 7] = [
    "DateTimeOriginal",
    "CreateDate",
    "ModifyDate",
    "TrackCreateDate",
    "TrackModifyDate",
    "MediaCreateDate",
    "MediaModifyDate",
];

const MODIFY_DATE_TAG: &str = "ModifyDate";

const DESCRIPTION_TAGS: [&str; 3] = ["Description", "Caption-Abstract", "ImageDescription"];

/// The time tags a classification adds on top of the SubSec tags every file gets.
pub fn classification_time_tags(meta_type: MetaType) -> &'static [&'static str] {
    match meta_type {
        MetaType::Exif => &SUBSEC_TIME_TAGS,
        MetaType::QuickTime => &QUICKTIME_TIME_TAGS,
        MetaType::None => &[],
    }
}

/// Assembles the tags for one media file.
///
/// * every time tag gets the same `local_timestamp` string,
/// * the description fills all three description tags, or none,
/// * GPS is written only when altitude, latitude and longitude are all present.
pub fn build_write_tags(
    meta: &GoogleMetadata,
    meta_type: MetaType,
    local_timestamp: &str,
) -> WriteTags {
    let mut tags = WriteTags::new();

    // --- Capture time ---
    for tag in SUBSEC_TIME_TAGS {
        tags.insert(tag, local_timestamp.into());
    }
    for &tag in classification_time_tags(meta_type) {
        tags.insert(tag, local_timestamp.into());
    }
    tags.insert(MODIFY_DATE_TAG, local_timestamp.into());

    // --- Description ---
    if let Some(description) = &meta.description {
        for tag in DESCRIPTION_TAGS {
            tags.insert(tag, description.as_str().into());
        }
    }

    // --- GPS ---
    // *Ref tags get the stringified value, not a hemisphere or sea-level code.
    if let Some((altitude, latitude, longitude)) = meta.gps() {
        tags.insert("GPSAltitude", altitude.into());
        tags.insert("GPSAltitudeRef", TagValue::Text(altitude.to_string()));
        tags.insert("GPSLatitude", latitude.into());
        tags.insert("GPSLatitudeRef", TagValue::Text(latitude.to_string()));
        tags.insert("GPSLongitude", longitude.into());
        tags.insert("GPSLongitudeRef", TagValue::Text(longitude.to_string()));
    }

    tags
}
