//! Packet opcodes.
//!
//! Opcodes are grouped by object family in `0x100` blocks. Values are part of the wire ABI and
//! must never be renumbered.
//!
//! Pixel uploads come in two shapes: `*Offset` variants address the bound unpack buffer, data
//! variants carry the transfer rectangle as tightly packed rows (alignment 1, no skips). The
//! host applies its unpack state only to the former. Sync handles are allocated by the guest
//! and travel as `u64`.

macro_rules! gles_opcodes {
    ($($name:ident = $value:literal,)*) => {
        #[repr(u32)]
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum GlesOpcode {
            $($name = $value,)*
        }

        impl GlesOpcode {
            pub const fn from_u32(v: u32) -> Option<Self> {
                match v {
                    $($value => Some(Self::$name),)*
                    _ => None,
                }
            }

            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$name => stringify!($name),)*
                }
            }
        }
    };
}

gles_opcodes! {
    Nop = 0x000,
    ActiveTexture = 0x001,
    BlendColor = 0x002,
    BlendEquation = 0x003,
    BlendEquationSeparate = 0x004,
    BlendFunc = 0x005,
    BlendFuncSeparate = 0x006,
    Clear = 0x007,
    ClearColor = 0x008,
    ClearDepthf = 0x009,
    ClearStencil = 0x00A,
    ColorMask = 0x00B,
    CullFace = 0x00C,
    DepthFunc = 0x00D,
    DepthMask = 0x00E,
    DepthRangef = 0x00F,
    Disable = 0x010,
    Enable = 0x011,
    Finish = 0x012,
    Flush = 0x013,
    FrontFace = 0x014,
    Hint = 0x015,
    LineWidth = 0x016,
    PixelStorei = 0x017,
    PolygonOffset = 0x018,
    SampleCoverage = 0x019,
    Scissor = 0x01A,
    StencilFunc = 0x01B,
    StencilFuncSeparate = 0x01C,
    StencilMask = 0x01D,
    StencilMaskSeparate = 0x01E,
    StencilOp = 0x01F,
    StencilOpSeparate = 0x020,
    Viewport = 0x021,
    IsEnabled = 0x022,
    GetError = 0x023,
    GetIntegerv = 0x024,
    GetFloatv = 0x025,
    GetBooleanv = 0x026,
    GetInteger64v = 0x027,
    GetIntegeriv = 0x028,
    GetInteger64iv = 0x029,
    GetString = 0x02A,
    GetInternalformativ = 0x02B,
    ClearBufferiv = 0x02C,
    ClearBufferuiv = 0x02D,
    ClearBufferfv = 0x02E,
    ClearBufferfi = 0x02F,
    GetStringi = 0x030,

    GenBuffers = 0x100,
    DeleteBuffers = 0x101,
    BindBuffer = 0x102,
    BufferData = 0x103,
    BufferSubData = 0x104,
    MapBufferRange = 0x105,
    UnmapBuffer = 0x106,
    FlushMappedBufferRange = 0x107,
    CopyBufferSubData = 0x108,
    BindBufferRange = 0x109,
    BindBufferBase = 0x10A,
    IsBuffer = 0x10B,
    GetBufferParameteriv = 0x10C,
    GetBufferParameteri64v = 0x10D,

    GenTextures = 0x200,
    DeleteTextures = 0x201,
    BindTexture = 0x202,
    TexParameterf = 0x203,
    TexParameteri = 0x204,
    TexParameterfv = 0x205,
    TexParameteriv = 0x206,
    GetTexParameterfv = 0x207,
    GetTexParameteriv = 0x208,
    TexImage2D = 0x209,
    TexImage2DOffset = 0x20A,
    TexSubImage2D = 0x20B,
    TexSubImage2DOffset = 0x20C,
    TexImage3D = 0x20D,
    TexImage3DOffset = 0x20E,
    TexSubImage3D = 0x20F,
    TexSubImage3DOffset = 0x210,
    CopyTexImage2D = 0x211,
    CopyTexSubImage2D = 0x212,
    CompressedTexImage2D = 0x213,
    CompressedTexImage2DOffset = 0x214,
    CompressedTexSubImage2D = 0x215,
    CompressedTexSubImage2DOffset = 0x216,
    CompressedTexImage3D = 0x217,
    CompressedTexImage3DOffset = 0x218,
    CompressedTexSubImage3D = 0x219,
    CompressedTexSubImage3DOffset = 0x21A,
    TexStorage2D = 0x21B,
    TexStorage3D = 0x21C,
    TexStorage2DMultisample = 0x21D,
    GenerateMipmap = 0x21E,
    EglImageTargetTexture2DOes = 0x21F,
    IsTexture = 0x220,

    GenRenderbuffers = 0x300,
    DeleteRenderbuffers = 0x301,
    BindRenderbuffer = 0x302,
    RenderbufferStorage = 0x303,
    RenderbufferStorageMultisample = 0x304,
    GetRenderbufferParameteriv = 0x305,
    EglImageTargetRenderbufferStorageOes = 0x306,
    IsRenderbuffer = 0x307,
    GenFramebuffers = 0x310,
    DeleteFramebuffers = 0x311,
    BindFramebuffer = 0x312,
    FramebufferTexture2D = 0x313,
    FramebufferRenderbuffer = 0x314,
    FramebufferTextureLayer = 0x315,
    FramebufferParameteri = 0x316,
    CheckFramebufferStatus = 0x317,
    GetFramebufferAttachmentParameteriv = 0x318,
    DrawBuffers = 0x319,
    ReadBuffer = 0x31A,
    BlitFramebuffer = 0x31B,
    InvalidateFramebuffer = 0x31C,
    InvalidateSubFramebuffer = 0x31D,
    ReadPixels = 0x31E,
    ReadPixelsOffset = 0x31F,
    IsFramebuffer = 0x320,

    GenVertexArrays = 0x400,
    DeleteVertexArrays = 0x401,
    BindVertexArray = 0x402,
    EnableVertexAttribArray = 0x403,
    DisableVertexAttribArray = 0x404,
    VertexAttribPointerOffset = 0x405,
    VertexAttribPointerData = 0x406,
    VertexAttribIPointerOffset = 0x407,
    VertexAttribIPointerData = 0x408,
    VertexAttribDivisor = 0x409,
    VertexAttribFormat = 0x40A,
    VertexAttribIFormat = 0x40B,
    VertexAttribBinding = 0x40C,
    VertexBindingDivisor = 0x40D,
    BindVertexBuffer = 0x40E,
    VertexAttribFv = 0x40F,
    VertexAttribI4i = 0x410,
    VertexAttribI4ui = 0x411,
    GetVertexAttribfv = 0x412,
    IsVertexArray = 0x413,
    GetVertexAttribiv = 0x414,
    GetVertexAttribPointerv = 0x415,

    DrawArrays = 0x500,
    DrawArraysInstanced = 0x501,
    DrawElementsOffset = 0x502,
    DrawElementsData = 0x503,
    DrawElementsInstancedOffset = 0x504,
    DrawElementsInstancedData = 0x505,
    DrawArraysIndirect = 0x506,
    DrawElementsIndirect = 0x507,
    DispatchCompute = 0x508,
    DispatchComputeIndirect = 0x509,
    MemoryBarrier = 0x50A,
    DrawRangeElementsOffset = 0x50B,
    DrawRangeElementsData = 0x50C,

    CreateShader = 0x600,
    DeleteShader = 0x601,
    ShaderString = 0x602,
    CompileShader = 0x603,
    GetShaderiv = 0x604,
    GetShaderInfoLog = 0x605,
    GetShaderPrecisionFormat = 0x606,
    CreateProgram = 0x607,
    DeleteProgram = 0x608,
    AttachShader = 0x609,
    DetachShader = 0x60A,
    LinkProgram = 0x60B,
    UseProgram = 0x60C,
    ValidateProgram = 0x60D,
    GetProgramiv = 0x60E,
    GetProgramInfoLog = 0x60F,
    BindAttribLocation = 0x610,
    GetAttribLocation = 0x611,
    GetUniformLocation = 0x612,
    GetActiveUniform = 0x613,
    GetActiveAttrib = 0x614,
    GetUniformBlockIndex = 0x615,
    UniformBlockBinding = 0x616,
    GetActiveUniformBlockiv = 0x617,
    TransformFeedbackVaryings = 0x618,
    GetTransformFeedbackVarying = 0x619,
    GetUniformfv = 0x61A,
    GetUniformiv = 0x61B,
    GetUniformuiv = 0x61C,
    ReleaseShaderCompiler = 0x61D,
    GetShaderSource = 0x61E,
    GetAttachedShaders = 0x61F,
    UniformFv = 0x620,
    UniformIv = 0x621,
    UniformUiv = 0x622,
    UniformMatrixFv = 0x623,
    IsShader = 0x624,
    IsProgram = 0x625,

    GenQueries = 0x700,
    DeleteQueries = 0x701,
    BeginQuery = 0x702,
    EndQuery = 0x703,
    GetQueryiv = 0x704,
    GetQueryObjectuiv = 0x705,
    IsQuery = 0x706,
    GenTransformFeedbacks = 0x710,
    DeleteTransformFeedbacks = 0x711,
    BindTransformFeedback = 0x712,
    BeginTransformFeedback = 0x713,
    EndTransformFeedback = 0x714,
    PauseTransformFeedback = 0x715,
    ResumeTransformFeedback = 0x716,
    IsTransformFeedback = 0x717,
    GenSamplers = 0x720,
    DeleteSamplers = 0x721,
    BindSampler = 0x722,
    SamplerParameteri = 0x723,
    SamplerParameterf = 0x724,
    SamplerParameteriv = 0x725,
    SamplerParameterfv = 0x726,
    GetSamplerParameteriv = 0x727,
    GetSamplerParameterfv = 0x728,
    IsSampler = 0x729,
    FenceSync = 0x730,
    ClientWaitSync = 0x731,
    WaitSync = 0x732,
    DeleteSync = 0x733,
    GetSynciv = 0x734,
    IsSync = 0x735,
}
