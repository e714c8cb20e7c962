//! Domain Services
//!
//! Pure functions building the copy users see.

use crate::domain::value_objects::{Destination, DestinationType, SharePayload, ShareChannel};

const EMAIL_SUBJECT: &str = "You’re invited to try the Carton Caps app!";

const RESOLVED_TITLE: &str = "You've been invited to join Carton Caps!";
const RESOLVED_BODY: &str =
    "Sign up today to start earning for your school and help support America's teachers";
const RESOLVED_PRIMARY_CTA: &str = "Sign up";
const RESOLVED_SECONDARY_CTA: &str = "Sign in";

/// Text the referrer sends, with `share_url` embedded verbatim
///
/// Email gets a subject and a longer body; every other channel gets a short
/// message and no subject.
pub fn build_share_payload(channel: ShareChannel, share_url: &str) -> SharePayload {
    match channel {
        ShareChannel::Email => SharePayload {
            channel,
            subject: Some(EMAIL_SUBJECT.to_string()),
            message: format!(
                "Hey!\n\n\
                 Join me in earning cash for our school by using the Carton Caps app. \
                 It's an easy way to make a difference. All you have to do is buy \
                 Carton Caps participating products (like Cheerios!) and scan your \
                 grocery receipt. Carton Caps are worth $.10 each and they add up fast! \
                 Twice a year, our school receives a check to help pay for whatever we need.\n\n\
                 Download the Carton Caps app here: {share_url}"
            ),
        },
        ShareChannel::Sms | ShareChannel::ShareSheet | ShareChannel::CopyLink => SharePayload {
            channel,
            subject: None,
            message: format!(
                "Hi! Join me in earning money for our school by using Carton Caps app. \
                 It's an easy way to make a difference. Use the link below to download \
                 the Carton Caps app: {share_url}"
            ),
        },
    }
}

/// Landing copy shown to a referred user
pub fn referral_destination(destination_type: DestinationType) -> Destination {
    Destination {
        destination_type,
        title: RESOLVED_TITLE.to_string(),
        body: RESOLVED_BODY.to_string(),
        primary_cta: RESOLVED_PRIMARY_CTA.to_string(),
        secondary_cta: RESOLVED_SECONDARY_CTA.to_string(),
    }
}
