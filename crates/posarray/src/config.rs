// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2026 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! Positional array codec configuration.

/// Default maximum nesting depth of records within one payload.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Configuration for [`ArrayCodec`](crate::codec::ArrayCodec).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArrayCodecConfig {
    /// Maximum depth of nested records (and lists of records) accepted while decoding.
    pub max_depth: usize,
}

impl Default for ArrayCodecConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ArrayCodecConfig {
    /// Returns the configuration with `max_depth` replaced.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
