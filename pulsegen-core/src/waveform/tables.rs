//! Base waveform tables.
//!
//! Every table is a `static` built during const evaluation, so a code above
//! the 12-bit range or a table of the wrong length is a compile error.

use super::{Sample, WaveformTable};
use crate::config::{SAMPLE_MAX, SAMPLE_MIDPOINT, TABLE_LEN};

/// Biphasic pulse: a decaying positive lobe, a return to midpoint at index
/// 300, then a rising negative lobe back towards midpoint.
pub static BIPHASIC: WaveformTable = WaveformTable::from_codes(&BIPHASIC_CODES);

/// Symmetric triangle starting and ending at the midpoint.
pub static TRIANGLE: WaveformTable = build_triangle();

/// Square wave: full scale for the first half cycle, zero for the second.
pub static SQUARE: WaveformTable = build_square();

/// Rising ramp from zero to full scale.
pub static RAMP: WaveformTable = build_ramp();

const HALF_SPAN: i32 = (SAMPLE_MAX - SAMPLE_MIDPOINT) as i32;

const fn build_triangle() -> WaveformTable {
    let quarter = (TABLE_LEN / 4) as i32;
    let mut samples = [Sample::MIDPOINT; TABLE_LEN];
    let mut i = 0;
    while i < TABLE_LEN {
        let x = i as i32;
        let offset = if x < quarter {
            HALF_SPAN * x / quarter
        } else if x < 3 * quarter {
            HALF_SPAN * (2 * quarter - x) / quarter
        } else {
            HALF_SPAN * (x - 4 * quarter) / quarter
        };
        samples[i] = Sample::saturating(SAMPLE_MIDPOINT as i32 + offset);
        i += 1;
    }
    WaveformTable { samples }
}

const fn build_square() -> WaveformTable {
    let mut samples = [Sample::MIN; TABLE_LEN];
    let mut i = 0;
    while i < TABLE_LEN / 2 {
        samples[i] = Sample::MAX;
        i += 1;
    }
    WaveformTable { samples }
}

const fn build_ramp() -> WaveformTable {
    let mut samples = [Sample::MIN; TABLE_LEN];
    let mut i = 0;
    while i < TABLE_LEN {
        let code = i as i32 * SAMPLE_MAX as i32 / (TABLE_LEN as i32 - 1);
        samples[i] = Sample::saturating(code);
        i += 1;
    }
    WaveformTable { samples }
}

#[rustfmt::skip]
const BIPHASIC_CODES: [u16; TABLE_LEN] = [
    2048, 4093, 4091, 4088, 4085, 4083, 4080, 4077, 4075, 4072, 4069, 4066, 4064, 4061, 4058,
    4055, 4052, 4050, 4047, 4044, 4041, 4038, 4036, 4033, 4030, 4027, 4024, 4021, 4018, 4015,
    4012, 4009, 4007, 4004, 4001, 3998, 3995, 3992, 3989, 3986, 3983, 3980, 3977, 3973, 3970,
    3967, 3964, 3961, 3958, 3955, 3952, 3949, 3946, 3942, 3939, 3936, 3933, 3930, 3926, 3923,
    3920, 3917, 3913, 3910, 3907, 3904, 3900, 3897, 3894, 3890, 3887, 3884, 3880, 3877, 3874,
    3870, 3867, 3863, 3860, 3856, 3853, 3850, 3846, 3843, 3839, 3836, 3832, 3829, 3825, 3821,
    3818, 3814, 3811, 3807, 3803, 3800, 3796, 3792, 3789, 3785, 3781, 3778, 3774, 3770, 3767,
    3763, 3759, 3755, 3751, 3748, 3744, 3740, 3736, 3732, 3728, 3725, 3721, 3717, 3713, 3709,
    3705, 3701, 3697, 3693, 3689, 3685, 3681, 3677, 3673, 3669, 3665, 3661, 3657, 3652, 3648,
    3644, 3640, 3636, 3632, 3627, 3623, 3619, 3615, 3610, 3606, 3602, 3598, 3593, 3589, 3585,
    3580, 3576, 3571, 3567, 3563, 3558, 3554, 3549, 3545, 3540, 3536, 3531, 3527, 3522, 3518,
    3513, 3508, 3504, 3499, 3494, 3490, 3485, 3480, 3476, 3471, 3466, 3462, 3457, 3452, 3447,
    3442, 3437, 3433, 3428, 3423, 3418, 3413, 3408, 3403, 3398, 3393, 3388, 3383, 3378, 3373,
    3368, 3363, 3358, 3353, 3348, 3342, 3337, 3332, 3327, 3322, 3316, 3311, 3306, 3301, 3295,
    3290, 3285, 3279, 3274, 3268, 3263, 3258, 3252, 3247, 3241, 3236, 3230, 3225, 3219, 3213,
    3208, 3202, 3197, 3191, 3185, 3180, 3174, 3168, 3162, 3157, 3151, 3145, 3139, 3133, 3127,
    3122, 3116, 3110, 3104, 3098, 3092, 3086, 3080, 3074, 3068, 3062, 3055, 3049, 3043, 3037,
    3031, 3025, 3018, 3012, 3006, 3000, 2993, 2987, 2981, 2974, 2968, 2961, 2955, 2948, 2942,
    2935, 2929, 2922, 2916, 2909, 2903, 2896, 2889, 2883, 2876, 2869, 2862, 2856, 2849, 2842,
    2835, 2828, 2821, 2815, 2808, 2801, 2794, 2787, 2780, 2773, 2766, 2758, 2751, 2744, 2737,
    2048, 0, 3, 5, 8, 11, 13, 16, 19, 22, 24, 27, 30, 33, 35,
    38, 41, 44, 47, 49, 52, 55, 58, 61, 64, 66, 69, 72, 75, 78,
    81, 84, 87, 90, 93, 96, 99, 102, 105, 108, 111, 114, 117, 120, 123,
    126, 129, 132, 135, 138, 142, 145, 148, 151, 154, 157, 161, 164, 167, 170,
    173, 177, 180, 183, 186, 190, 193, 196, 200, 203, 206, 210, 213, 216, 220,
    223, 227, 230, 233, 237, 240, 244, 247, 251, 254, 258, 261, 265, 268, 272,
    276, 279, 283, 286, 290, 294, 297, 301, 305, 308, 312, 316, 319, 323, 327,
    331, 334, 338, 342, 346, 350, 353, 357, 361, 365, 369, 373, 377, 381, 384,
    388, 392, 396, 400, 404, 408, 412, 416, 420, 425, 429, 433, 437, 441, 445,
    449, 453, 458, 462, 466, 470, 474, 479, 483, 487, 491, 496, 500, 504, 509,
    513, 518, 522, 526, 531, 535, 540, 544, 549, 553, 558, 562, 567, 571, 576,
    580, 585, 590, 594, 599, 604, 608, 613, 618, 622, 627, 632, 637, 641, 646,
    651, 656, 661, 666, 670, 675, 680, 685, 690, 695, 700, 705, 710, 715, 720,
    725, 730, 735, 741, 746, 751, 756, 761, 766, 772, 777, 782, 787, 793, 798,
    803, 809, 814, 819, 825, 830, 836, 841, 847, 852, 858, 863, 869, 874, 880,
    885, 891, 897, 902, 908, 914, 919, 925, 931, 937, 943, 948, 954, 960, 966,
    972, 978, 984, 990, 996, 1002, 1008, 1014, 1020, 1026, 1032, 1038, 1044, 1050, 1056,
    1063, 1069, 1075, 1081, 1087, 1094, 1100, 1106, 1113, 1119, 1126, 1132, 1138, 1145, 1151,
    1158, 1164, 1171, 1178, 1184, 1191, 1197, 1204, 1211, 1217, 1224, 1231, 1238, 1244, 1251,
    1258, 1265, 1272, 1279, 1286, 1293, 1300, 1307, 1314, 1321, 1328, 1335, 1342, 1349, 2048,
];
