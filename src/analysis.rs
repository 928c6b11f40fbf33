// SPDX-License-Identifier: BSD-3-Clause
pub mod alias;
