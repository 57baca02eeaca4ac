// SPDX-FileCopyrightText: 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto
// SPDX-License-Identifier: MIT
pub mod benchmark;
pub mod cost;
pub mod mechanics;
pub mod performance;
pub mod sustainability; // CO2 breakdown, index and rank
