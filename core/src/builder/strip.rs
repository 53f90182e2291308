//! Comment out template lines for channels and hooks the user code never
//! touches.
//!
//! Each marker token sits at the start of a template line. When the user
//! code mentions the channel (`.texcoord2`, `.vertexColor`, ...) or defines
//! the numbered hook, the token is removed; otherwise it becomes `//` and the
//! line is dropped by the compiler.

/// Hook layers the chains template supports.
pub const MAX_LAYERS: u32 = 30;

/// Channel tokens with the usage markers that keep them.
const CHANNELS: &[(&str, &[&str])] = &[
    ("%SCREENPOS%", &[".screenPos", "screenUV"]),
    ("%UV0%", &[".texcoord0"]),
    ("%UV1%", &[".texcoord1"]),
    ("%UV2%", &[".texcoord2"]),
    ("%UV3%", &[".texcoord3"]),
    ("%VFACE%", &[".isFrontFace"]),
    ("%LOCALSPACEPOSITION%", &[".localSpacePosition"]),
    ("%LOCALSPACENORMAL%", &[".localSpaceNormal"]),
    ("%LOCALSPACETANGENT%", &[".localSpaceTangent"]),
    ("%VERTEXCOLOR%", &[".vertexColor"]),
    ("%EXTRAV2F0%", &[".extraV2F0"]),
    ("%EXTRAV2F1%", &[".extraV2F1"]),
    ("%EXTRAV2F2%", &[".extraV2F2"]),
    ("%EXTRAV2F3%", &[".extraV2F3"]),
    ("%EXTRAV2F4%", &[".extraV2F4"]),
    ("%EXTRAV2F5%", &[".extraV2F5"]),
    ("%EXTRAV2F6%", &[".extraV2F6"]),
    ("%EXTRAV2F7%", &[".extraV2F7"]),
    ("%VERTEXID%", &[".vertexID"]),
];

/// Interpolator tokens that `StripV2F` can also force off.
const V2F_CHANNELS: &[(&str, &str)] = &[
    ("%V2FUV0%", ".texcoord0"),
    ("%V2FUV1%", ".texcoord1"),
    ("%V2FUV2%", ".texcoord2"),
    ("%V2FUV3%", ".texcoord3"),
    ("%V2FVERTEXCOLOR%", ".vertexColor"),
];

/// Token prefix and hook name for each chained hook.
const HOOK_LAYERS: &[(&str, &str)] = &[
    ("MODIFYVERTEX", "ModifyVertex"),
    ("DISPLACEVERTEX", "ModifyTessellatedVertex"),
    ("SURFACEFUNCTION", "SurfaceFunction"),
    ("FINALCOLORFORWARD", "FinalColorForward"),
    ("FINALCOLORGBUFFERSTANDARD", "FinalGBufferStandard"),
];

/// Resolve every strip marker in `template` against comment-free user `code`.
pub fn strip(code: &str, template: String, v2f_strip: Option<&str>) -> String {
    let mut out = template;

    for (token, markers) in CHANNELS {
        let used = markers.iter().any(|m| code.contains(m));
        out = toggle(out, token, used);
    }

    for (token, marker) in V2F_CHANNELS {
        let forced_off = v2f_strip.is_some_and(|s| s.contains(&marker[1..]));
        out = toggle(out, token, code.contains(marker) && !forced_off);
    }

    for layer in 0..MAX_LAYERS {
        for (prefix, hook) in HOOK_LAYERS {
            let token = format!("%{prefix}{layer}%");
            let marker = format!(" Ext_{hook}{layer} ");
            out = toggle(out, &token, code.contains(&marker));
        }
    }

    out
}

fn toggle(text: String, token: &str, keep: bool) -> String {
    if !text.contains(token) {
        return text;
    }
    text.replace(token, if keep { "" } else { "//" })
}
