//! Shader composition: splices the VAT decode into the base template.
//!
//! Each playback material composes its own shader source from the immutable
//! template constants — nothing shared is ever mutated, so constructing one
//! material cannot affect pipelines built from the same template. The splice
//! points are exactly two fixed marker lines inside `vs_mesh`; everything
//! else in the template passes through untouched.

use anyhow::{bail, Result};

/// Base forward template. Valid WGSL as-is (markers are comments); used
/// directly for the non-VAT static path.
pub const BASE_TEMPLATE: &str = include_str!("shader.wgsl");

/// VAT bindings and helpers, prepended to the composed module.
const VAT_LIB: &str = include_str!("vat.wgsl");

/// Marker where the base vertex stage begins accumulating displacement.
pub const POSITION_MARKER: &str = "//@vat:position";
/// Marker where the base vertex stage derives the shading normal.
pub const NORMAL_MARKER: &str = "//@vat:normal";

const NORMAL_SECTION_BEGIN: &str = "//@vat-normal-begin";
const NORMAL_SECTION_END: &str = "//@vat-normal-end";

const POSITION_SITE: &str = "disp += vat_displacement(in.lookup);";
const NORMAL_SITE: &str = "nrm = vat_shading_normal(in.lookup);";

/// Compose a per-instance shader source for VAT playback.
///
/// With `with_normal` false the normal-texture bindings and helpers are
/// stripped and the normal marker is left in place as a comment, so the base
/// pipeline's own normal path stays in effect.
pub fn compose_vat_shader(template: &str, with_normal: bool) -> Result<String> {
    // Validate the template shape up front: both fixed points must exist
    // exactly once even when only one is spliced.
    require_once(template, POSITION_MARKER)?;
    require_once(template, NORMAL_MARKER)?;

    let lib = if with_normal {
        VAT_LIB.to_string()
    } else {
        strip_normal_sections(VAT_LIB)?
    };

    let mut out = template.replacen(POSITION_MARKER, POSITION_SITE, 1);
    if with_normal {
        out = out.replacen(NORMAL_MARKER, NORMAL_SITE, 1);
    }
    Ok(format!("{lib}\n{out}"))
}

fn require_once(template: &str, marker: &str) -> Result<()> {
    match template.matches(marker).count() {
        1 => Ok(()),
        0 => bail!("shader template is missing the {marker} splice point"),
        n => bail!("shader template has {n} copies of the {marker} splice point"),
    }
}

/// Drop the `//@vat-normal-begin` .. `//@vat-normal-end` regions of the VAT
/// library (bindings and helpers only used when a normal texture is bound).
fn strip_normal_sections(lib: &str) -> Result<String> {
    let mut out = String::with_capacity(lib.len());
    let mut in_section = false;
    for line in lib.lines() {
        let trimmed = line.trim();
        if trimmed == NORMAL_SECTION_BEGIN {
            if in_section {
                bail!("nested {NORMAL_SECTION_BEGIN} in VAT shader library");
            }
            in_section = true;
            continue;
        }
        if trimmed == NORMAL_SECTION_END {
            if !in_section {
                bail!("unmatched {NORMAL_SECTION_END} in VAT shader library");
            }
            in_section = false;
            continue;
        }
        if !in_section {
            out.push_str(line);
            out.push('\n');
        }
    }
    if in_section {
        bail!("unterminated {NORMAL_SECTION_BEGIN} in VAT shader library");
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composes_both_splice_points() {
        let out = compose_vat_shader(BASE_TEMPLATE, true).expect("compose");
        assert_eq!(out.matches(POSITION_SITE).count(), 1);
        assert_eq!(out.matches(NORMAL_SITE).count(), 1);
        assert!(out.contains("fn vat_displacement"));
        assert!(out.contains("fn vat_shading_normal"));
        assert!(!out.contains(POSITION_MARKER));
    }

    #[test]
    fn position_only_leaves_base_normal_path() {
        let out = compose_vat_shader(BASE_TEMPLATE, false).expect("compose");
        assert_eq!(out.matches(POSITION_SITE).count(), 1);
        // Normal splice point stays a comment; no normal-texture binding or
        // helper survives the strip.
        assert!(out.contains(NORMAL_MARKER));
        assert!(!out.contains("vat_normal_tex"));
        assert!(!out.contains("vat_shading_normal"));
    }

    #[test]
    fn shared_template_is_not_mutated() {
        let before = BASE_TEMPLATE.to_string();
        let _a = compose_vat_shader(BASE_TEMPLATE, true).expect("compose");
        let _b = compose_vat_shader(BASE_TEMPLATE, false).expect("compose");
        assert_eq!(BASE_TEMPLATE, before);
        assert!(BASE_TEMPLATE.contains(POSITION_MARKER));
        assert!(BASE_TEMPLATE.contains(NORMAL_MARKER));
    }

    #[test]
    fn missing_marker_is_an_error() {
        assert!(compose_vat_shader("fn vs_mesh() {}", true).is_err());
        let no_normal = BASE_TEMPLATE.replace(NORMAL_MARKER, "");
        assert!(compose_vat_shader(&no_normal, true).is_err());
    }

    #[test]
    fn duplicated_marker_is_an_error() {
        let doubled = format!("{BASE_TEMPLATE}\n{POSITION_MARKER}\n");
        assert!(compose_vat_shader(&doubled, true).is_err());
    }
}
