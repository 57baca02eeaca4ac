// SPDX-FileCopyrightText: 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto
// SPDX-License-Identifier: MIT
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::formulas::{aci_elastic_modulus, split_tensile_strength};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MechanicalEstimate {
    pub split_tensile_mpa: f64,
    pub elastic_modulus_gpa: f64,
}

pub struct MechanicsEngine;

impl MechanicsEngine {
    /// Empirical tensile and stiffness estimates from 28-day compressive strength.
    ///
    /// Rejects negative or non-finite strength instead of producing NaN.
    pub fn estimate(strength_mpa: f64) -> Result<MechanicalEstimate> {
        Ok(MechanicalEstimate {
            split_tensile_mpa: split_tensile_strength(strength_mpa)?,
            elastic_modulus_gpa: aci_elastic_modulus(strength_mpa)?,
        })
    }
}
