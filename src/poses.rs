//! Static pose catalog, grouped by gender

use crate::models::Gender;

/// A named standing posture the service is instructed to enforce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pose {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

pub const FEMALE_POSES: &[Pose] = &[
    Pose {
        id: "F1",
        title: "Triangle Stand",
        description: "Classic base: weight on one leg (back/outer), other leg relaxed slightly bent, hip slightly pushed, shoulder relaxed, one hand naturally down.",
    },
    Pose {
        id: "F2",
        title: "Elegant Cross Leg",
        description: "One leg lightly placed in front of the other, body front or slightly sideways, elegant and steady, balanced posture.",
    },
    Pose {
        id: "F3",
        title: "One Hand Pocket",
        description: "Weight on one leg, only one hand in pocket for fashion look, other hand naturally down with relaxed wrist.",
    },
    Pose {
        id: "F4",
        title: "Ankle Cross",
        description: "French relaxed style: Front leg crosses lightly in front of back leg, toe touching ground, knee not locked, slight cross, one hand on waist or in pocket.",
    },
    Pose {
        id: "F5",
        title: "Natural Side Stand",
        description: "Slightly sideways, legs relaxed, one bent one straight, natural and elegant.",
    },
    Pose {
        id: "F6",
        title: "Hand on Hip",
        description: "Body slightly side, confident and powerful, relaxed posture, one hand on hip one down.",
    },
    Pose {
        id: "F7",
        title: "Arms Crossed",
        description: "Upright, focused gaze, calm and noble.",
    },
    Pose {
        id: "F8",
        title: "Soft S-Curve",
        description: "S-curve soft, highlighting drape and silhouette.",
    },
    Pose {
        id: "F9",
        title: "Runway Stop",
        description: "Body 3/4 angle, upper body straight with slight S-curve, head up, chin in, looking forward; right hand on waist, left arm down, legs crossed, back leg weight bearing, front leg crossed forward pointing toe.",
    },
];

pub const MALE_POSES: &[Pose] = &[
    Pose {
        id: "M1",
        title: "Front Relaxed",
        description: "Full body front, body slightly turned, weight on one leg, other leg relaxed slightly forward; one hand in pocket, other down.",
    },
    Pose {
        id: "M2",
        title: "Minimal Upright",
        description: "Front upright, shoulders relaxed, arms down, back straight looking at camera. Feet slightly offset, clean minimalist.",
    },
    Pose {
        id: "M3",
        title: "Casual Pocket",
        description: "Front casual, weight slightly to side, both hands in pockets. Feet natural split step, head slightly tilted, cool expression.",
    },
    Pose {
        id: "M4",
        title: "Lazy Stance",
        description: "Front lazy, hands in pockets, shoulders relaxed. Weight to one side, feet natural offset, head tilted, cold expression.",
    },
    Pose {
        id: "M5",
        title: "Clean Straight",
        description: "Front natural upright, shoulders relaxed, arms down, eyes controlled. Feet slightly apart and offset, clean and sharp.",
    },
    Pose {
        id: "M6",
        title: "Runway Walk",
        description: "Runway straight line, core tight, chest up, shoulders relaxed, gaze forward; arms slight swing. Feet crossing in line, hip stable.",
    },
];

/// Full catalog for one gender
pub fn poses_for(gender: Gender) -> &'static [Pose] {
    match gender {
        Gender::Female => FEMALE_POSES,
        Gender::Male => MALE_POSES,
    }
}

/// Looks up a pose by id within one gender's catalog
pub fn find_pose(gender: Gender, id: &str) -> Option<&'static Pose> {
    poses_for(gender).iter().find(|pose| pose.id == id)
}

pub fn is_valid_pose(gender: Gender, id: &str) -> bool {
    find_pose(gender, id).is_some()
}

/// Fallback selection when a gender switch leaves nothing selected
pub fn default_pose(gender: Gender) -> &'static Pose {
    &poses_for(gender)[0]
}
