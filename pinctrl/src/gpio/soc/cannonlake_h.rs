//! Cannon Lake-H (300 series PCH-H) pin tables

use super::{CommunityDesc, Function, PinDesc, PinGroup, SocData};
use crate::gpio::topology::Features;

const PAD_OWN: usize = 0x020;
const PADCFGLOCK: usize = 0x080;
const HOSTSW_OWN: usize = 0x0c0;
const GPI_IE: usize = 0x120;

/// Community covering pins `start..=end`, groups synthesized 24 at a time
const fn community(barno: usize, start: u32, end: u32) -> CommunityDesc {
    CommunityDesc {
        barno,
        padown_offset: Some(PAD_OWN),
        padcfglock_offset: Some(PADCFGLOCK),
        hostown_offset: Some(HOSTSW_OWN),
        ie_offset: GPI_IE,
        pin_base: start,
        npins: end - start + 1,
        gpp_size: 24,
        gpp_num_padown_regs: Some(4),
        gpps: &[],
        features: Features::empty(),
    }
}

pub const PINS: &[PinDesc] = &[
    // GPP_A
    PinDesc::new(0, "RCINB"),
    PinDesc::new(1, "LAD_0"),
    PinDesc::new(2, "LAD_1"),
    PinDesc::new(3, "LAD_2"),
    PinDesc::new(4, "LAD_3"),
    PinDesc::new(5, "LFRAMEB"),
    PinDesc::new(6, "SERIRQ"),
    PinDesc::new(7, "PIRQAB"),
    PinDesc::new(8, "CLKRUNB"),
    PinDesc::new(9, "CLKOUT_LPC_0"),
    PinDesc::new(10, "CLKOUT_LPC_1"),
    PinDesc::new(11, "PMEB"),
    PinDesc::new(12, "BM_BUSYB"),
    PinDesc::new(13, "SUSWARNB_SUSPWRDNACK"),
    PinDesc::new(14, "SUS_STATB"),
    PinDesc::new(15, "SUSACKB"),
    PinDesc::new(16, "CLKOUT_48"),
    PinDesc::new(17, "SD_VDD1_PWR_EN_B"),
    PinDesc::new(18, "ISH_GP_0"),
    PinDesc::new(19, "ISH_GP_1"),
    PinDesc::new(20, "ISH_GP_2"),
    PinDesc::new(21, "ISH_GP_3"),
    PinDesc::new(22, "ISH_GP_4"),
    PinDesc::new(23, "ISH_GP_5"),
    PinDesc::new(24, "ESPI_CLK_LOOPBK"),
    // GPP_B
    PinDesc::new(25, "GSPI0_CS1B"),
    PinDesc::new(26, "GSPI1_CS1B"),
    PinDesc::new(27, "VRALERTB"),
    PinDesc::new(28, "CPU_GP_2"),
    PinDesc::new(29, "CPU_GP_3"),
    PinDesc::new(30, "SRCCLKREQB_0"),
    PinDesc::new(31, "SRCCLKREQB_1"),
    PinDesc::new(32, "SRCCLKREQB_2"),
    PinDesc::new(33, "SRCCLKREQB_3"),
    PinDesc::new(34, "SRCCLKREQB_4"),
    PinDesc::new(35, "SRCCLKREQB_5"),
    PinDesc::new(36, "SSP_MCLK"),
    PinDesc::new(37, "SLP_S0B"),
    PinDesc::new(38, "PLTRSTB"),
    PinDesc::new(39, "SPKR"),
    PinDesc::new(40, "GSPI0_CS0B"),
    PinDesc::new(41, "GSPI0_CLK"),
    PinDesc::new(42, "GSPI0_MISO"),
    PinDesc::new(43, "GSPI0_MOSI"),
    PinDesc::new(44, "GSPI1_CS0B"),
    PinDesc::new(45, "GSPI1_CLK"),
    PinDesc::new(46, "GSPI1_MISO"),
    PinDesc::new(47, "GSPI1_MOSI"),
    PinDesc::new(48, "SML1ALERTB"),
    PinDesc::new(49, "GSPI0_CLK_LOOPBK"),
    PinDesc::new(50, "GSPI1_CLK_LOOPBK"),
    // GPP_C
    PinDesc::new(51, "SMBCLK"),
    PinDesc::new(52, "SMBDATA"),
    PinDesc::new(53, "SMBALERTB"),
    PinDesc::new(54, "SML0CLK"),
    PinDesc::new(55, "SML0DATA"),
    PinDesc::new(56, "SML0ALERTB"),
    PinDesc::new(57, "SML1CLK"),
    PinDesc::new(58, "SML1DATA"),
    PinDesc::new(59, "UART0_RXD"),
    PinDesc::new(60, "UART0_TXD"),
    PinDesc::new(61, "UART0_RTSB"),
    PinDesc::new(62, "UART0_CTSB"),
    PinDesc::new(63, "UART1_RXD"),
    PinDesc::new(64, "UART1_TXD"),
    PinDesc::new(65, "UART1_RTSB"),
    PinDesc::new(66, "UART1_CTSB"),
    PinDesc::new(67, "I2C0_SDA"),
    PinDesc::new(68, "I2C0_SCL"),
    PinDesc::new(69, "I2C1_SDA"),
    PinDesc::new(70, "I2C1_SCL"),
    PinDesc::new(71, "UART2_RXD"),
    PinDesc::new(72, "UART2_TXD"),
    PinDesc::new(73, "UART2_RTSB"),
    PinDesc::new(74, "UART2_CTSB"),
    // GPP_D
    PinDesc::new(75, "SPI1_CSB"),
    PinDesc::new(76, "SPI1_CLK"),
    PinDesc::new(77, "SPI1_MISO_IO_1"),
    PinDesc::new(78, "SPI1_MOSI_IO_0"),
    PinDesc::new(79, "ISH_I2C2_SDA"),
    PinDesc::new(80, "SSP2_SFRM"),
    PinDesc::new(81, "SSP2_TXD"),
    PinDesc::new(82, "SSP2_RXD"),
    PinDesc::new(83, "SSP2_SCLK"),
    PinDesc::new(84, "ISH_SPI_CSB"),
    PinDesc::new(85, "ISH_SPI_CLK"),
    PinDesc::new(86, "ISH_SPI_MISO"),
    PinDesc::new(87, "ISH_SPI_MOSI"),
    PinDesc::new(88, "ISH_UART0_RXD"),
    PinDesc::new(89, "ISH_UART0_TXD"),
    PinDesc::new(90, "ISH_UART0_RTSB"),
    PinDesc::new(91, "ISH_UART0_CTSB"),
    PinDesc::new(92, "DMIC_CLK_1"),
    PinDesc::new(93, "DMIC_DATA_1"),
    PinDesc::new(94, "DMIC_CLK_0"),
    PinDesc::new(95, "DMIC_DATA_0"),
    PinDesc::new(96, "SPI1_IO_2"),
    PinDesc::new(97, "SPI1_IO_3"),
    PinDesc::new(98, "ISH_I2C2_SCL"),
    // GPP_G
    PinDesc::new(99, "SD3_CMD"),
    PinDesc::new(100, "SD3_D0"),
    PinDesc::new(101, "SD3_D1"),
    PinDesc::new(102, "SD3_D2"),
    PinDesc::new(103, "SD3_D3"),
    PinDesc::new(104, "SD3_CDB"),
    PinDesc::new(105, "SD3_CLK"),
    PinDesc::new(106, "SD3_WP"),
    // AZA
    PinDesc::new(107, "HDA_BCLK"),
    PinDesc::new(108, "HDA_RSTB"),
    PinDesc::new(109, "HDA_SYNC"),
    PinDesc::new(110, "HDA_SDO"),
    PinDesc::new(111, "HDA_SDI_0"),
    PinDesc::new(112, "HDA_SDI_1"),
    PinDesc::new(113, "SSP1_SFRM"),
    PinDesc::new(114, "SSP1_TXD"),
    // vGPIO
    PinDesc::new(115, "CNV_BTEN"),
    PinDesc::new(116, "CNV_GNEN"),
    PinDesc::new(117, "CNV_WFEN"),
    PinDesc::new(118, "CNV_WCEN"),
    PinDesc::new(119, "CNV_BT_HOST_WAKEB"),
    PinDesc::new(120, "vCNV_GNSS_HOST_WAKEB"),
    PinDesc::new(121, "vSD3_CD_B"),
    PinDesc::new(122, "CNV_BT_IF_SELECT"),
    PinDesc::new(123, "vCNV_BT_UART_TXD"),
    PinDesc::new(124, "vCNV_BT_UART_RXD"),
    PinDesc::new(125, "vCNV_BT_UART_CTS_B"),
    PinDesc::new(126, "vCNV_BT_UART_RTS_B"),
    PinDesc::new(127, "vCNV_MFUART1_TXD"),
    PinDesc::new(128, "vCNV_MFUART1_RXD"),
    PinDesc::new(129, "vCNV_MFUART1_CTS_B"),
    PinDesc::new(130, "vCNV_MFUART1_RTS_B"),
    PinDesc::new(131, "vCNV_GNSS_UART_TXD"),
    PinDesc::new(132, "vCNV_GNSS_UART_RXD"),
    PinDesc::new(133, "vCNV_GNSS_UART_CTS_B"),
    PinDesc::new(134, "vCNV_GNSS_UART_RTS_B"),
    PinDesc::new(135, "vUART0_TXD"),
    PinDesc::new(136, "vUART0_RXD"),
    PinDesc::new(137, "vUART0_CTS_B"),
    PinDesc::new(138, "vUART0_RTSB"),
    PinDesc::new(139, "vISH_UART0_TXD"),
    PinDesc::new(140, "vISH_UART0_RXD"),
    PinDesc::new(141, "vISH_UART0_CTS_B"),
    PinDesc::new(142, "vISH_UART0_RTSB"),
    PinDesc::new(143, "vISH_UART1_TXD"),
    PinDesc::new(144, "vISH_UART1_RXD"),
    PinDesc::new(145, "vISH_UART1_CTS_B"),
    PinDesc::new(146, "vISH_UART1_RTS_B"),
    PinDesc::new(147, "vCNV_BT_I2S_BCLK"),
    PinDesc::new(148, "vCNV_BT_I2S_WS_SYNC"),
    PinDesc::new(149, "vCNV_BT_I2S_SDO"),
    PinDesc::new(150, "vCNV_BT_I2S_SDI"),
    PinDesc::new(151, "vSSP2_SCLK"),
    PinDesc::new(152, "vSSP2_SFRM"),
    PinDesc::new(153, "vSSP2_TXD"),
    PinDesc::new(154, "vSSP2_RXD"),
    // GPP_K
    PinDesc::new(155, "FAN_TACH_0"),
    PinDesc::new(156, "FAN_TACH_1"),
    PinDesc::new(157, "FAN_TACH_2"),
    PinDesc::new(158, "FAN_TACH_3"),
    PinDesc::new(159, "FAN_TACH_4"),
    PinDesc::new(160, "FAN_TACH_5"),
    PinDesc::new(161, "FAN_TACH_6"),
    PinDesc::new(162, "FAN_TACH_7"),
    PinDesc::new(163, "FAN_PWM_0"),
    PinDesc::new(164, "FAN_PWM_1"),
    PinDesc::new(165, "FAN_PWM_2"),
    PinDesc::new(166, "FAN_PWM_3"),
    PinDesc::new(167, "GSXDOUT"),
    PinDesc::new(168, "GSXSLOAD"),
    PinDesc::new(169, "GSXDIN"),
    PinDesc::new(170, "GSXSRESETB"),
    PinDesc::new(171, "GSXCLK"),
    PinDesc::new(172, "ADR_COMPLETE"),
    PinDesc::new(173, "NMIB"),
    PinDesc::new(174, "SMIB"),
    PinDesc::new(175, "CORE_VID_0"),
    PinDesc::new(176, "CORE_VID_1"),
    PinDesc::new(177, "IMGCLKOUT_0"),
    PinDesc::new(178, "IMGCLKOUT_1"),
    // GPP_H
    PinDesc::new(179, "SRCCLKREQB_6"),
    PinDesc::new(180, "SRCCLKREQB_7"),
    PinDesc::new(181, "SRCCLKREQB_8"),
    PinDesc::new(182, "SRCCLKREQB_9"),
    PinDesc::new(183, "SRCCLKREQB_10"),
    PinDesc::new(184, "SRCCLKREQB_11"),
    PinDesc::new(185, "SRCCLKREQB_12"),
    PinDesc::new(186, "SRCCLKREQB_13"),
    PinDesc::new(187, "SRCCLKREQB_14"),
    PinDesc::new(188, "SRCCLKREQB_15"),
    PinDesc::new(189, "SML2CLK"),
    PinDesc::new(190, "SML2DATA"),
    PinDesc::new(191, "SML2ALERTB"),
    PinDesc::new(192, "SML3CLK"),
    PinDesc::new(193, "SML3DATA"),
    PinDesc::new(194, "SML3ALERTB"),
    PinDesc::new(195, "SML4CLK"),
    PinDesc::new(196, "SML4DATA"),
    PinDesc::new(197, "SML4ALERTB"),
    PinDesc::new(198, "ISH_I2C0_SDA"),
    PinDesc::new(199, "ISH_I2C0_SCL"),
    PinDesc::new(200, "ISH_I2C1_SDA"),
    PinDesc::new(201, "ISH_I2C1_SCL"),
    PinDesc::new(202, "TIME_SYNC_0"),
    // GPP_E
    PinDesc::new(203, "SATAXPCIE_0"),
    PinDesc::new(204, "SATAXPCIE_1"),
    PinDesc::new(205, "SATAXPCIE_2"),
    PinDesc::new(206, "CPU_GP_0"),
    PinDesc::new(207, "SATA_DEVSLP_0"),
    PinDesc::new(208, "SATA_DEVSLP_1"),
    PinDesc::new(209, "SATA_DEVSLP_2"),
    PinDesc::new(210, "CPU_GP_1"),
    PinDesc::new(211, "SATA_LEDB"),
    PinDesc::new(212, "USB2_OCB_0"),
    PinDesc::new(213, "USB2_OCB_1"),
    PinDesc::new(214, "USB2_OCB_2"),
    PinDesc::new(215, "USB2_OCB_3"),
    // GPP_F
    PinDesc::new(216, "SATAXPCIE_3"),
    PinDesc::new(217, "SATAXPCIE_4"),
    PinDesc::new(218, "SATAXPCIE_5"),
    PinDesc::new(219, "SATAXPCIE_6"),
    PinDesc::new(220, "SATAXPCIE_7"),
    PinDesc::new(221, "SATA_DEVSLP_3"),
    PinDesc::new(222, "SATA_DEVSLP_4"),
    PinDesc::new(223, "SATA_DEVSLP_5"),
    PinDesc::new(224, "SATA_DEVSLP_6"),
    PinDesc::new(225, "SATA_DEVSLP_7"),
    PinDesc::new(226, "SATA_SCLOCK"),
    PinDesc::new(227, "SATA_SLOAD"),
    PinDesc::new(228, "SATA_SDATAOUT1"),
    PinDesc::new(229, "SATA_SDATAOUT0"),
    PinDesc::new(230, "EXT_PWR_GATEB"),
    PinDesc::new(231, "USB2_OCB_4"),
    PinDesc::new(232, "USB2_OCB_5"),
    PinDesc::new(233, "USB2_OCB_6"),
    PinDesc::new(234, "USB2_OCB_7"),
    PinDesc::new(235, "L_VDDEN"),
    PinDesc::new(236, "L_BKLTEN"),
    PinDesc::new(237, "L_BKLTCTL"),
    PinDesc::new(238, "DDPF_CTRLCLK"),
    PinDesc::new(239, "DDPF_CTRLDATA"),
    // SPI
    PinDesc::new(240, "SPI0_IO_2"),
    PinDesc::new(241, "SPI0_IO_3"),
    PinDesc::new(242, "SPI0_MOSI_IO_0"),
    PinDesc::new(243, "SPI0_MISO_IO_1"),
    PinDesc::new(244, "SPI0_TPM_CSB"),
    PinDesc::new(245, "SPI0_FLASH_0_CSB"),
    PinDesc::new(246, "SPI0_FLASH_1_CSB"),
    PinDesc::new(247, "SPI0_CLK"),
    PinDesc::new(248, "SPI0_CLK_LOOPBK"),
    // CPU
    PinDesc::new(249, "HDACPU_SDI"),
    PinDesc::new(250, "HDACPU_SDO"),
    PinDesc::new(251, "HDACPU_SCLK"),
    PinDesc::new(252, "PM_SYNC"),
    PinDesc::new(253, "PECI"),
    PinDesc::new(254, "CPUPWRGD"),
    PinDesc::new(255, "THRMTRIPB"),
    PinDesc::new(256, "PLTRST_CPUB"),
    PinDesc::new(257, "PM_DOWN"),
    PinDesc::new(258, "TRIGGER_IN"),
    PinDesc::new(259, "TRIGGER_OUT"),
    // JTAG
    PinDesc::new(260, "JTAG_TDO"),
    PinDesc::new(261, "JTAGX"),
    PinDesc::new(262, "PRDYB"),
    PinDesc::new(263, "PREQB"),
    PinDesc::new(264, "CPU_TRSTB"),
    PinDesc::new(265, "JTAG_TDI"),
    PinDesc::new(266, "JTAG_TMS"),
    PinDesc::new(267, "JTAG_TCK"),
    PinDesc::new(268, "ITP_PMODE"),
    // GPP_I
    PinDesc::new(269, "DDSP_HPD_0"),
    PinDesc::new(270, "DDSP_HPD_1"),
    PinDesc::new(271, "DDSP_HPD_2"),
    PinDesc::new(272, "DDSP_HPD_3"),
    PinDesc::new(273, "EDP_HPD"),
    PinDesc::new(274, "DDPB_CTRLCLK"),
    PinDesc::new(275, "DDPB_CTRLDATA"),
    PinDesc::new(276, "DDPC_CTRLCLK"),
    PinDesc::new(277, "DDPC_CTRLDATA"),
    PinDesc::new(278, "DDPD_CTRLCLK"),
    PinDesc::new(279, "DDPD_CTRLDATA"),
    PinDesc::new(280, "M2_SKT2_CFG_0"),
    PinDesc::new(281, "M2_SKT2_CFG_1"),
    PinDesc::new(282, "M2_SKT2_CFG_2"),
    PinDesc::new(283, "M2_SKT2_CFG_3"),
    PinDesc::new(284, "SYS_PWROK"),
    PinDesc::new(285, "SYS_RESETB"),
    PinDesc::new(286, "MLK_RSTB"),
    // GPP_J
    PinDesc::new(287, "CNV_PA_BLANKING"),
    PinDesc::new(288, "CNV_GNSS_FTA"),
    PinDesc::new(289, "CNV_GNSS_SYSCK"),
    PinDesc::new(290, "CNV_RF_RESET_B"),
    PinDesc::new(291, "CNV_BRI_DT"),
    PinDesc::new(292, "CNV_BRI_RSP"),
    PinDesc::new(293, "CNV_RGI_DT"),
    PinDesc::new(294, "CNV_RGI_RSP"),
    PinDesc::new(295, "CNV_MFUART2_RXD"),
    PinDesc::new(296, "CNV_MFUART2_TXD"),
    PinDesc::new(297, "CNV_MODEM_CLKREQ"),
    PinDesc::new(298, "A4WP_PRESENT"),
];

const SPI0_PINS: &[u32] = &[40, 41, 42, 43];
const SPI1_PINS: &[u32] = &[44, 45, 46, 47];
const SPI2_PINS: &[u32] = &[84, 85, 86, 87];
const UART0_PINS: &[u32] = &[59, 60, 61, 62];
const UART1_PINS: &[u32] = &[63, 64, 65, 66];
const UART2_PINS: &[u32] = &[71, 72, 73, 74];
const I2C0_PINS: &[u32] = &[67, 68];
const I2C1_PINS: &[u32] = &[69, 70];
const I2C2_PINS: &[u32] = &[88, 89];
const I2C3_PINS: &[u32] = &[79, 98];

pub const GROUPS: &[PinGroup] = &[
    PinGroup {
        name: "spi0_grp",
        pins: SPI0_PINS,
        mode: 1,
    },
    PinGroup {
        name: "spi1_grp",
        pins: SPI1_PINS,
        mode: 1,
    },
    PinGroup {
        name: "spi2_grp",
        pins: SPI2_PINS,
        mode: 3,
    },
    PinGroup {
        name: "uart0_grp",
        pins: UART0_PINS,
        mode: 1,
    },
    PinGroup {
        name: "uart1_grp",
        pins: UART1_PINS,
        mode: 1,
    },
    PinGroup {
        name: "uart2_grp",
        pins: UART2_PINS,
        mode: 1,
    },
    PinGroup {
        name: "i2c0_grp",
        pins: I2C0_PINS,
        mode: 1,
    },
    PinGroup {
        name: "i2c1_grp",
        pins: I2C1_PINS,
        mode: 1,
    },
    PinGroup {
        name: "i2c2_grp",
        pins: I2C2_PINS,
        mode: 3,
    },
    PinGroup {
        name: "i2c3_grp",
        pins: I2C3_PINS,
        mode: 2,
    },
];

pub const FUNCTIONS: &[Function] = &[
    Function {
        name: "spi0",
        groups: &["spi0_grp"],
    },
    Function {
        name: "spi1",
        groups: &["spi1_grp"],
    },
    Function {
        name: "spi2",
        groups: &["spi2_grp"],
    },
    Function {
        name: "uart0",
        groups: &["uart0_grp"],
    },
    Function {
        name: "uart1",
        groups: &["uart1_grp"],
    },
    Function {
        name: "uart2",
        groups: &["uart2_grp"],
    },
    Function {
        name: "i2c0",
        groups: &["i2c0_grp"],
    },
    Function {
        name: "i2c1",
        groups: &["i2c1_grp"],
    },
    Function {
        name: "i2c2",
        groups: &["i2c2_grp"],
    },
    Function {
        name: "i2c3",
        groups: &["i2c3_grp"],
    },
];

pub const COMMUNITIES: &[CommunityDesc] = &[
    community(0, 0, 50),
    community(1, 51, 154),
    community(2, 155, 248),
    community(3, 249, 298),
];

pub const SOC_DATA: SocData = SocData {
    name: "cannonlake-h",
    pins: PINS,
    groups: GROUPS,
    functions: FUNCTIONS,
    communities: COMMUNITIES,
};
