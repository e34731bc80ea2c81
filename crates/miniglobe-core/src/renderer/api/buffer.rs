// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Defines data structures related to pixel staging buffers.

use serde::{Deserialize, Serialize};

/// How a write pixel buffer is expected to be used. Drivers may use it to
/// pick a memory heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WritePixelBufferHint {
    /// Written once, used a few times.
    #[default]
    StreamDraw,
    /// Written once, used many times.
    StaticDraw,
    /// Written repeatedly, used many times.
    DynamicDraw,
}

/// How a read pixel buffer is expected to be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ReadPixelBufferHint {
    /// Filled once, read a few times.
    #[default]
    StreamRead,
    /// Filled once, read many times.
    StaticRead,
    /// Filled repeatedly, read many times.
    DynamicRead,
}

/// The transfer direction a pixel buffer was created for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelBufferUsage {
    /// CPU writes, GPU reads (texture uploads).
    Write(WritePixelBufferHint),
    /// GPU writes, CPU reads (texture downloads).
    Read(ReadPixelBufferHint),
}

impl PixelBufferUsage {
    /// Returns `true` for buffers that feed texture uploads.
    pub fn is_write(&self) -> bool {
        matches!(self, PixelBufferUsage::Write(_))
    }
}
