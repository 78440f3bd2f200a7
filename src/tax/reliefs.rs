//! Personal tax reliefs: per-relief caps and the joint voluntary-contribution cap

use serde::{Deserialize, Serialize};

use crate::calculator::{push_warning, Calculation};
use crate::tables::ReliefCaps;

/// Annual relief amounts as claimed by the taxpayer
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReliefClaims {
    pub spouse: f64,
    pub disabled: f64,
    pub children: f64,
    pub parents: f64,
    pub lifestyle: f64,
    pub education: f64,
    pub medical: f64,
    /// Private retirement scheme contributions
    pub prs: f64,
    pub life_insurance: f64,
    pub zakat: f64,
    pub donations: f64,
}

/// One relief as claimed and as allowed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedRelief {
    pub name: String,
    pub claimed: f64,
    pub allowed: f64,
    /// None for uncapped reliefs
    pub cap: Option<f64>,
}

impl AppliedRelief {
    pub fn was_capped(&self) -> bool {
        self.allowed < self.claimed
    }
}

/// Allowed reliefs and their total
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReliefSummary {
    pub reliefs: Vec<AppliedRelief>,
    pub total: f64,
}

impl ReliefSummary {
    pub fn get(&self, name: &str) -> Option<&AppliedRelief> {
        self.reliefs.iter().find(|r| r.name == name)
    }

    fn add(&mut self, name: &str, claimed: f64, allowed: f64, cap: Option<f64>) {
        self.total += allowed;
        self.reliefs.push(AppliedRelief {
            name: name.to_string(),
            claimed,
            allowed,
            cap,
        });
    }
}

fn non_negative_claim(name: &str, amount: f64, warnings: &mut Vec<String>) -> f64 {
    if amount.is_nan() || amount < 0.0 {
        push_warning(warnings, format!("{} relief cannot be negative; using RM0", name));
        0.0
    } else {
        amount
    }
}

fn capped_claim(name: &str, amount: f64, cap: f64, warnings: &mut Vec<String>) -> f64 {
    let amount = non_negative_claim(name, amount, warnings);
    if amount > cap {
        push_warning(
            warnings,
            format!("{} relief of RM{:.2} capped at RM{:.2}", name, amount, cap),
        );
        cap
    } else {
        amount
    }
}

/// Clamp each claimed relief into `[0, cap]` and total them
///
/// Personal relief is always granted. Voluntary EPF, PRS and life insurance
/// share one joint cap. Every clamped relief produces a warning naming it.
pub fn compute_reliefs(
    claims: &ReliefClaims,
    voluntary_epf_annual: f64,
    caps: &ReliefCaps,
) -> Calculation<ReliefSummary> {
    let mut warnings = Vec::new();
    let mut summary = ReliefSummary::default();

    summary.add("Personal", caps.personal, caps.personal, Some(caps.personal));

    for (name, claimed) in [("Spouse", claims.spouse), ("Disabled", claims.disabled)] {
        let allowed = non_negative_claim(name, claimed, &mut warnings);
        summary.add(name, claimed, allowed, None);
    }

    for (name, claimed, cap) in [
        ("Children", claims.children, caps.children),
        ("Parents", claims.parents, caps.parents),
        ("Lifestyle", claims.lifestyle, caps.lifestyle),
        ("Education fees", claims.education, caps.education),
        ("Medical expenses", claims.medical, caps.medical),
    ] {
        let allowed = capped_claim(name, claimed, cap, &mut warnings);
        summary.add(name, claimed, allowed, Some(cap));
    }

    let voluntary = non_negative_claim("Voluntary EPF", voluntary_epf_annual, &mut warnings)
        + non_negative_claim("PRS", claims.prs, &mut warnings)
        + non_negative_claim("Life insurance", claims.life_insurance, &mut warnings);
    let allowed = capped_claim(
        "Voluntary contributions (EPF + PRS + life insurance)",
        voluntary,
        caps.voluntary_contributions,
        &mut warnings,
    );
    summary.add(
        "Voluntary contributions",
        voluntary,
        allowed,
        Some(caps.voluntary_contributions),
    );

    for (name, claimed) in [("Zakat", claims.zakat), ("Donations", claims.donations)] {
        let allowed = non_negative_claim(name, claimed, &mut warnings);
        summary.add(name, claimed, allowed, None);
    }

    Calculation::new(summary, warnings)
}
